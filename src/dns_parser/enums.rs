use std::fmt;

use super::Error;

/// The TYPE value of a resource record.
///
/// Codes the resolver never inspects are carried through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    A,
    NS,
    CNAME,
    SOA,
    AAAA,
    Other(u16),
}

impl Type {
    pub fn code(self) -> u16 {
        match self {
            Type::A => 1,
            Type::NS => 2,
            Type::CNAME => 5,
            Type::SOA => 6,
            Type::AAAA => 28,
            Type::Other(code) => code,
        }
    }

    pub fn from_code(code: u16) -> Type {
        match code {
            1 => Type::A,
            2 => Type::NS,
            5 => Type::CNAME,
            6 => Type::SOA,
            28 => Type::AAAA,
            code => Type::Other(code),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Type::A => f.write_str("A"),
            Type::NS => f.write_str("NS"),
            Type::CNAME => f.write_str("CNAME"),
            Type::SOA => f.write_str("SOA"),
            Type::AAAA => f.write_str("AAAA"),
            Type::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}

/// The QTYPE value of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    A,
    NS,
    CNAME,
    SOA,
    AAAA,
    All,
}

impl QueryType {
    pub fn code(self) -> u16 {
        match self {
            QueryType::A => 1,
            QueryType::NS => 2,
            QueryType::CNAME => 5,
            QueryType::SOA => 6,
            QueryType::AAAA => 28,
            QueryType::All => 255,
        }
    }

    pub fn parse(code: u16) -> Result<QueryType, Error> {
        match code {
            1 => Ok(QueryType::A),
            2 => Ok(QueryType::NS),
            5 => Ok(QueryType::CNAME),
            6 => Ok(QueryType::SOA),
            28 => Ok(QueryType::AAAA),
            255 => Ok(QueryType::All),
            code => Err(Error::InvalidQueryType(code)),
        }
    }
}

/// The CLASS value of a resource record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    IN,
    CH,
    HS,
    /// Anything else, e.g. the payload size carried by an OPT pseudo-record.
    Other(u16),
}

impl Class {
    pub fn code(self) -> u16 {
        match self {
            Class::IN => 1,
            Class::CH => 3,
            Class::HS => 4,
            Class::Other(code) => code,
        }
    }

    pub fn from_code(code: u16) -> Class {
        match code {
            1 => Class::IN,
            3 => Class::CH,
            4 => Class::HS,
            code => Class::Other(code),
        }
    }
}

/// The QCLASS value of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    IN,
    CH,
    HS,
    Any,
}

impl QueryClass {
    pub fn code(self) -> u16 {
        match self {
            QueryClass::IN => 1,
            QueryClass::CH => 3,
            QueryClass::HS => 4,
            QueryClass::Any => 255,
        }
    }

    pub fn parse(code: u16) -> Result<QueryClass, Error> {
        match code {
            1 => Ok(QueryClass::IN),
            3 => Ok(QueryClass::CH),
            4 => Ok(QueryClass::HS),
            255 => Ok(QueryClass::Any),
            code => Err(Error::InvalidQueryClass(code)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    StandardQuery,
    InverseQuery,
    ServerStatusRequest,
    Reserved(u8),
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Opcode {
        match code {
            0 => Opcode::StandardQuery,
            1 => Opcode::InverseQuery,
            2 => Opcode::ServerStatusRequest,
            x => Opcode::Reserved(x),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        match opcode {
            Opcode::StandardQuery => 0,
            Opcode::InverseQuery => 1,
            Opcode::ServerStatusRequest => 2,
            Opcode::Reserved(x) => x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Reserved(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> ResponseCode {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            x => ResponseCode::Reserved(x),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> u8 {
        match code {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServerFailure => 2,
            ResponseCode::NameError => 3,
            ResponseCode::NotImplemented => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Reserved(x) => x,
        }
    }
}
