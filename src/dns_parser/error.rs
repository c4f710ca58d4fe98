use thiserror::Error;

/// Error parsing DNS packet
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("packet is smaller than header size")]
    HeaderTooShort,
    #[error("packet has incomplete data")]
    UnexpectedEOF,
    #[error("wrong (too short or too long) size of RDATA")]
    WrongRdataLength,
    #[error("packet has non-zero reserved bits")]
    ReservedBitsAreNonZero,
    #[error("label in domain name has unknown label format")]
    UnknownLabelFormat,
    #[error("compression pointer does not point backwards")]
    BadPointer,
    #[error("query type {0} is invalid")]
    InvalidQueryType(u16),
    #[error("query class {0} is invalid")]
    InvalidQueryClass(u16),
    #[error("invalid characters encountered while reading label")]
    LabelIsNotAscii,
}
