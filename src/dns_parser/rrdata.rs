use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::{Error, Name, Type};

/// The enumeration that represents known types of DNS resource records data
#[derive(Debug, Clone)]
pub enum RRData<'a> {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(Name<'a>),
    CNAME(Name<'a>),
    SOA {
        primary_ns: Name<'a>,
        mailbox: Name<'a>,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum_ttl: u32,
    },
    // Anything that can't be parsed yet
    Unknown {
        typ: Type,
        data: &'a [u8],
    },
}

impl<'a> RRData<'a> {
    pub fn typ(&self) -> Type {
        match *self {
            RRData::A(..) => Type::A,
            RRData::AAAA(..) => Type::AAAA,
            RRData::NS(..) => Type::NS,
            RRData::CNAME(..) => Type::CNAME,
            RRData::SOA { .. } => Type::SOA,
            RRData::Unknown { typ, .. } => typ,
        }
    }

    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        match *self {
            RRData::A(ip) => writer.write_u32::<BigEndian>(ip.into()),
            RRData::AAAA(ip) => writer.write_all(&ip.octets()),
            RRData::NS(ref name) | RRData::CNAME(ref name) => name.write_to(writer),
            RRData::SOA {
                ref primary_ns,
                ref mailbox,
                serial,
                refresh,
                retry,
                expire,
                minimum_ttl,
            } => {
                primary_ns.write_to(writer)?;
                mailbox.write_to(writer)?;
                for value in [serial, refresh, retry, expire, minimum_ttl] {
                    writer.write_u32::<BigEndian>(value)?;
                }
                Ok(())
            }
            RRData::Unknown { data, .. } => writer.write_all(data),
        }
    }

    /// Decodes `rdata`, a subslice of the packet `original`.
    pub fn parse(typ: Type, rdata: &'a [u8], original: &'a [u8]) -> Result<RRData<'a>, Error> {
        match typ {
            Type::A => {
                if rdata.len() != 4 {
                    return Err(Error::WrongRdataLength);
                }
                Ok(RRData::A(Ipv4Addr::from(BigEndian::read_u32(rdata))))
            }
            Type::AAAA => {
                let octets: [u8; 16] = rdata.try_into().map_err(|_| Error::WrongRdataLength)?;
                Ok(RRData::AAAA(Ipv6Addr::from(octets)))
            }
            Type::NS => Ok(RRData::NS(Self::single_name(rdata, original)?)),
            Type::CNAME => Ok(RRData::CNAME(Self::single_name(rdata, original)?)),
            Type::SOA => {
                let (primary_ns, used) = Name::scan(rdata, original)?;
                let (mailbox, used2) = Name::scan(&rdata[used..], original)?;
                let rest = &rdata[used + used2..];
                if rest.len() != 20 {
                    return Err(Error::WrongRdataLength);
                }
                Ok(RRData::SOA {
                    primary_ns,
                    mailbox,
                    serial: BigEndian::read_u32(&rest[..4]),
                    refresh: BigEndian::read_u32(&rest[4..8]),
                    retry: BigEndian::read_u32(&rest[8..12]),
                    expire: BigEndian::read_u32(&rest[12..16]),
                    minimum_ttl: BigEndian::read_u32(&rest[16..20]),
                })
            }
            typ => Ok(RRData::Unknown { typ, data: rdata }),
        }
    }

    fn single_name(rdata: &'a [u8], original: &'a [u8]) -> Result<Name<'a>, Error> {
        let (name, used) = Name::scan(rdata, original)?;
        if used != rdata.len() {
            return Err(Error::WrongRdataLength);
        }
        Ok(name)
    }
}
