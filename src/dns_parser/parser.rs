use byteorder::{BigEndian, ByteOrder};

use super::{Class, Error, Header, Name, Packet, QueryClass, QueryType, Question};
use super::{RRData, ResourceRecord, Type};

impl<'a> Packet<'a> {
    /// Parse a full DNS packet and return a structure that has all the data
    /// borrowed from the passed buffer.
    pub fn parse(data: &'a [u8]) -> Result<Packet<'a>, Error> {
        let header = Header::parse(data)?;
        let mut offset = Header::SIZE;

        let mut questions = Vec::with_capacity(header.questions as usize);
        for _ in 0..header.questions {
            let (qname, used) = Name::scan(&data[offset..], data)?;
            offset += used;
            if offset + 4 > data.len() {
                return Err(Error::UnexpectedEOF);
            }
            let qtype = QueryType::parse(BigEndian::read_u16(&data[offset..offset + 2]))?;
            let qclass = QueryClass::parse(BigEndian::read_u16(&data[offset + 2..offset + 4]))?;
            offset += 4;
            questions.push(Question {
                qname,
                qtype,
                qclass,
            });
        }

        let answers = parse_records(data, &mut offset, header.answers)?;
        let nameservers = parse_records(data, &mut offset, header.nameservers)?;
        let additional = parse_records(data, &mut offset, header.additional)?;

        Ok(Packet {
            header,
            questions,
            answers,
            nameservers,
            additional,
        })
    }
}

fn parse_records<'a>(
    data: &'a [u8],
    offset: &mut usize,
    count: u16,
) -> Result<Vec<ResourceRecord<'a>>, Error> {
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        records.push(parse_record(data, offset)?);
    }
    Ok(records)
}

fn parse_record<'a>(data: &'a [u8], offset: &mut usize) -> Result<ResourceRecord<'a>, Error> {
    let (name, used) = Name::scan(&data[*offset..], data)?;
    *offset += used;
    if *offset + 10 > data.len() {
        return Err(Error::UnexpectedEOF);
    }
    let fixed = &data[*offset..*offset + 10];
    let typ = Type::from_code(BigEndian::read_u16(&fixed[..2]));
    let cls = Class::from_code(BigEndian::read_u16(&fixed[2..4]));
    let ttl = BigEndian::read_u32(&fixed[4..8]);
    let rdlen = BigEndian::read_u16(&fixed[8..10]) as usize;
    *offset += 10;
    if *offset + rdlen > data.len() {
        return Err(Error::UnexpectedEOF);
    }
    let rdata = &data[*offset..*offset + rdlen];
    *offset += rdlen;
    Ok(ResourceRecord {
        name,
        cls,
        ttl,
        data: RRData::parse(typ, rdata, data)?,
    })
}
