//! Owned view of a decoded DNS response.

use std::fmt;
use std::io;
use std::net::Ipv4Addr;

use crate::dns_parser::{self, Name, Packet, QueryClass, QueryType, RRData, ResponseCode, Type};
use crate::error::Error;

/// The payload of a resource record, reduced to what resolution needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Ns(String),
    Other(Type),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn record_type(&self) -> Type {
        match self.data {
            RecordData::A(_) => Type::A,
            RecordData::Ns(_) => Type::NS,
            RecordData::Other(typ) => typ,
        }
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {} ", self.name, self.ttl, self.record_type())?;
        match self.data {
            RecordData::A(ip) => write!(f, "{}", ip),
            RecordData::Ns(ref host) => f.write_str(host),
            RecordData::Other(_) => f.write_str("..."),
        }
    }
}

impl<'a> From<&dns_parser::ResourceRecord<'a>> for ResourceRecord {
    fn from(rr: &dns_parser::ResourceRecord<'a>) -> Self {
        let data = match rr.data {
            RRData::A(ip) => RecordData::A(ip),
            RRData::NS(ref name) => RecordData::Ns(name.to_string()),
            ref other => RecordData::Other(other.typ()),
        };
        ResourceRecord {
            name: rr.name.to_string(),
            ttl: rr.ttl,
            data,
        }
    }
}

/// A decoded response. Never mutated after it is received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    pub id: u16,
    pub truncated: bool,
    pub response_code: ResponseCode,
    /// The queried name and type, if the server echoed the question.
    pub question: Option<(String, QueryType)>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// Decodes a wire packet.
    pub fn decode(data: &[u8]) -> Result<DnsMessage, dns_parser::Error> {
        let packet = Packet::parse(data)?;
        Ok(DnsMessage::from(&packet))
    }

    /// The address of the first A record in the answer section.
    pub fn first_address(&self) -> Option<Ipv4Addr> {
        self.answers.iter().find_map(|rr| match rr.data {
            RecordData::A(ip) => Some(ip),
            _ => None,
        })
    }

    /// Hostnames of the NS records in the authority section, in order.
    pub fn authority_nameservers(&self) -> Vec<&str> {
        self.authority
            .iter()
            .filter_map(|rr| match rr.data {
                RecordData::Ns(ref host) => Some(host.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl<'a> From<&Packet<'a>> for DnsMessage {
    fn from(packet: &Packet<'a>) -> Self {
        DnsMessage {
            id: packet.header.id,
            truncated: packet.header.truncated,
            response_code: packet.header.response_code,
            question: packet
                .questions
                .first()
                .map(|q| (q.qname.to_string(), q.qtype)),
            answers: packet.answers.iter().map(ResourceRecord::from).collect(),
            authority: packet.nameservers.iter().map(ResourceRecord::from).collect(),
            additional: packet.additional.iter().map(ResourceRecord::from).collect(),
        }
    }
}

/// Encodes a non-recursive A query for `domain`.
pub fn encode_query(id: u16, domain: &str) -> Result<Vec<u8>, Error> {
    let name = Name::from_str(domain);
    name.write_to(&mut io::sink())
        .map_err(|_| Error::InvalidDomain(domain.to_owned()))?;
    let query = dns_parser::Builder::new_query(id, false).add_question(
        &name,
        QueryType::A,
        QueryClass::IN,
    );
    // a single question always fits in 512 bytes
    Ok(query.build().unwrap_or_else(|packet| packet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns_parser::{Builder, Class};

    #[test]
    fn query_is_iterative_a_lookup() {
        let query = encode_query(0x1234, "example.com").unwrap();
        let packet = Packet::parse(&query).unwrap();
        assert_eq!(packet.header.id, 0x1234);
        assert!(!packet.header.recursion_desired);
        assert_eq!(packet.questions[0].qtype, QueryType::A);
        assert_eq!(packet.questions[0].qname.to_string(), "example.com");
    }

    #[test]
    fn query_rejects_oversized_label() {
        let domain = format!("{}.com", "x".repeat(70));
        assert!(matches!(
            encode_query(1, &domain),
            Err(Error::InvalidDomain(_))
        ));
    }

    #[test]
    fn decode_referral_sections() {
        let ns1 = Name::from_str("a.gtld-servers.net");
        let ns2 = Name::from_str("b.gtld-servers.net");
        let zone = Name::from_str("com");
        let wire = Builder::new_response(9, false, false)
            .add_question(&Name::from_str("example.com"), QueryType::A, QueryClass::IN)
            .add_nameserver(&zone, Class::IN, 172800, &RRData::NS(ns1.clone()))
            .add_nameserver(&zone, Class::IN, 172800, &RRData::NS(ns2))
            .add_additional(&ns1, Class::IN, 172800, &RRData::A(Ipv4Addr::new(192, 5, 6, 30)))
            .build()
            .unwrap();

        let msg = DnsMessage::decode(&wire).unwrap();
        assert_eq!(msg.id, 9);
        assert_eq!(msg.question, Some(("example.com".to_owned(), QueryType::A)));
        assert!(msg.answers.is_empty());
        assert_eq!(msg.first_address(), None);
        assert_eq!(
            msg.authority_nameservers(),
            vec!["a.gtld-servers.net", "b.gtld-servers.net"]
        );
        assert_eq!(msg.additional[0].record_type(), Type::A);
    }

    #[test]
    fn first_address_skips_cname() {
        let name = Name::from_str("www.example.com");
        let wire = Builder::new_response(1, false, true)
            .move_to::<dns_parser::Answers>()
            .add_answer(&name, Class::IN, 60, &RRData::CNAME(Name::from_str("example.com")))
            .add_answer(
                &Name::from_str("example.com"),
                Class::IN,
                60,
                &RRData::A(Ipv4Addr::new(93, 184, 216, 34)),
            )
            .build()
            .unwrap();

        let msg = DnsMessage::decode(&wire).unwrap();
        assert_eq!(msg.answers[0].data, RecordData::Other(Type::CNAME));
        assert_eq!(msg.first_address(), Some(Ipv4Addr::new(93, 184, 216, 34)));
        assert_eq!(msg.answers[1].to_string(), "example.com 60 A 93.184.216.34");
    }
}
