//! Lookups delegated to the resolver configured on this machine.

use std::net::Ipv4Addr;

use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::{ResolveError, TokioResolver};
use log::{debug, info};

use crate::error::{Error, LookupError};
use crate::referral::HostResolver;

/// What the system resolver knows about a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursiveAnswer {
    pub nameservers: Vec<String>,
    pub addresses: Vec<Ipv4Addr>,
}

/// A recursive resolver reading `/etc/resolv.conf` (or the platform
/// equivalent).
#[derive(Clone)]
pub struct SystemResolver {
    resolver: TokioResolver,
}

impl SystemResolver {
    pub fn new() -> Result<Self, Error> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|err| Error::Lookup {
                name: "system configuration".to_owned(),
                source: LookupError::Other(err.to_string()),
            })?
            .build();
        Ok(SystemResolver { resolver })
    }

    /// Looks up the NS records and then the A records of `domain`, letting
    /// the system resolver do all the recursion.
    pub async fn recursive_lookup(&self, domain: &str) -> Result<RecursiveAnswer, Error> {
        info!("[Recursive DNS Lookup] Resolving {}", domain);
        let fqdn = fully_qualified(domain);
        let lookup_error = |err: ResolveError| Error::Lookup {
            name: domain.to_owned(),
            source: classify(&err),
        };

        let nameservers: Vec<String> = self
            .resolver
            .ns_lookup(fqdn.as_str())
            .await
            .map_err(lookup_error)?
            .iter()
            .map(|ns| ns.to_string())
            .collect();
        debug!("{} is served by {:?}", domain, nameservers);

        let addresses = self
            .resolver
            .ipv4_lookup(fqdn.as_str())
            .await
            .map_err(lookup_error)?
            .iter()
            .map(|a| a.0)
            .collect();

        Ok(RecursiveAnswer {
            nameservers,
            addresses,
        })
    }
}

impl HostResolver for SystemResolver {
    async fn resolve_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, LookupError> {
        let lookup = self
            .resolver
            .ipv4_lookup(fully_qualified(host).as_str())
            .await
            .map_err(|err| classify(&err))?;
        Ok(lookup.iter().map(|a| a.0).collect())
    }
}

/// Appends the root dot so search domains are never tried.
fn fully_qualified(name: &str) -> String {
    format!("{}.", name.trim_end_matches('.'))
}

fn classify(err: &ResolveError) -> LookupError {
    match err.proto().map(|proto| proto.kind()) {
        Some(ProtoErrorKind::NoRecordsFound { response_code, .. }) => {
            if *response_code == ResponseCode::NXDomain {
                LookupError::NxDomain
            } else {
                LookupError::NoAnswer
            }
        }
        Some(ProtoErrorKind::Timeout) => LookupError::Timeout,
        _ => LookupError::Other(err.to_string()),
    }
}
