//! Minimal DNS wire codec.
//!
//! Builds single-question queries and parses the responses sent back by
//! root, TLD and authoritative servers. Only the record types the resolver
//! acts on are decoded; everything else is kept as raw rdata.

mod builder;
mod enums;
mod error;
mod header;
mod name;
mod parser;
mod rrdata;
mod structs;

pub use self::builder::{Additional, Answers, Builder, Nameservers, Questions};
pub use self::enums::{Class, Opcode, QueryClass, QueryType, ResponseCode, Type};
pub use self::error::Error;
pub use self::header::Header;
pub use self::name::Name;
pub use self::rrdata::RRData;
pub use self::structs::{Packet, Question, ResourceRecord};
