//! Resolve domain names to IPv4 addresses by walking the DNS delegation
//! hierarchy by hand: root servers first, then the TLD servers they refer
//! to, then the zone's authoritative servers.
//!
//! ```no_run
//! # async fn run() -> Result<(), dnswalk::Error> {
//! use dnswalk::{Config, IterativeResolver, NetTransport, SystemResolver};
//!
//! let resolver = IterativeResolver::new(NetTransport, SystemResolver::new()?, Config::default());
//! let resolution = resolver.resolve("example.com").await?;
//! println!("{}", resolution.address);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dns_parser;
pub mod domain;
mod error;
pub mod message;
pub mod referral;
pub mod resolver;
pub mod system;
pub mod transport;

#[cfg(test)]
mod testing;

pub use crate::config::{CandidatePolicy, Config, RootServer, ROOT_SERVERS};
pub use crate::error::{Error, LookupError};
pub use crate::message::{DnsMessage, RecordData, ResourceRecord};
pub use crate::referral::{extract_next_nameservers, HostResolver};
pub use crate::resolver::{Hop, IterativeResolver, Outcome, Resolution, Stage};
pub use crate::system::{RecursiveAnswer, SystemResolver};
pub use crate::transport::{backoff, NetTransport, QueryTransport, Transport};
