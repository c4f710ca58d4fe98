use std::io;
use std::net::Ipv4Addr;

use thiserror::Error;

use crate::dns_parser;
use crate::resolver::Stage;

/// Why a single hostname lookup through the system resolver failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("name does not exist")]
    NxDomain,
    #[error("no A record")]
    NoAnswer,
    #[error("lookup timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("timeout while querying {server}")]
    Timeout { server: Ipv4Addr },
    #[error("bad response from {server}: {source}")]
    MalformedResponse {
        server: Ipv4Addr,
        #[source]
        source: dns_parser::Error,
    },
    #[error("response from {server} does not match the query")]
    MismatchedResponse { server: Ipv4Addr },
    #[error("truncated UDP response from {server}")]
    Truncated { server: Ipv4Addr },
    #[error("no authority section found in the response")]
    NoAuthoritySection,
    #[error("nameserver {name} could not be resolved: {source}")]
    NameserverUnresolvable {
        name: String,
        #[source]
        source: LookupError,
    },
    #[error("all transports failed for {server}")]
    TransportFailure { server: Ipv4Addr },
    #[error("query failed at stage {stage} for {server}")]
    QueryFailed { stage: Stage, server: Ipv4Addr },
    #[error("resolution failed: no further candidates after stage {stage}")]
    ExhaustedCandidates { stage: Stage },
    #[error("gave up after {0} referrals")]
    TooManyReferrals(usize),
    #[error("answer from {server} carried no A record")]
    NoAddressInAnswer { server: Ipv4Addr },
    #[error("invalid domain {0:?}")]
    InvalidDomain(String),
    #[error("lookup of {name} failed: {source}")]
    Lookup {
        name: String,
        #[source]
        source: LookupError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the UDP stage should stop retrying and move on to TCP.
    pub fn aborts_udp(&self) -> bool {
        !matches!(self, Error::Timeout { .. })
    }
}
