//! The iterative resolution state machine: root, then TLD, then
//! authoritative servers, following referrals until an answer appears.

use std::collections::VecDeque;
use std::fmt;
use std::net::Ipv4Addr;

use log::{debug, error, info};

use crate::config::{CandidatePolicy, Config, ROOT_SERVERS};
use crate::error::Error;
use crate::referral::{extract_next_nameservers, HostResolver};
use crate::transport::{QueryTransport, Transport};

/// A tier of the delegation hierarchy. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Root,
    Tld,
    Auth,
}

impl Stage {
    /// The stage after a successful referral. `Auth` stays `Auth`.
    pub fn next(self) -> Stage {
        match self {
            Stage::Root => Stage::Tld,
            Stage::Tld | Stage::Auth => Stage::Auth,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Stage::Root => "ROOT",
            Stage::Tld => "TLD",
            Stage::Auth => "AUTH",
        })
    }
}

/// One server queried on the way to an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub stage: Stage,
    pub server: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub domain: String,
    pub address: Ipv4Addr,
    pub hops: Vec<Hop>,
}

/// Terminal result of resolving one domain.
pub type Outcome = Result<Resolution, Error>;

/// Resolves names by walking down from the root servers.
///
/// Nameserver hostnames found in referrals are resolved through `R`, never
/// through this resolver.
pub struct IterativeResolver<T, R> {
    transport: QueryTransport<T>,
    hosts: R,
    roots: Vec<Ipv4Addr>,
}

impl<T: Transport, R: HostResolver> IterativeResolver<T, R> {
    pub fn new(transport: T, hosts: R, config: Config) -> Self {
        IterativeResolver {
            transport: QueryTransport::new(transport, config),
            hosts,
            roots: ROOT_SERVERS.iter().map(|root| root.addr).collect(),
        }
    }

    /// Replaces the bootstrap root addresses.
    pub fn with_roots(mut self, roots: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        self.roots = roots.into_iter().collect();
        self
    }

    pub async fn resolve(&self, domain: &str) -> Outcome {
        info!("[Iterative DNS Lookup] Resolving {}", domain);
        let config = self.transport.config();

        let mut stage = Stage::Root;
        let mut candidates: VecDeque<Ipv4Addr> = self.roots.iter().copied().collect();
        let mut hops = Vec::new();
        let mut referrals = 0;

        loop {
            let server = candidates
                .pop_front()
                .ok_or(Error::ExhaustedCandidates { stage })?;
            hops.push(Hop { stage, server });

            let response = match self.transport.query(server, domain).await {
                Ok(response) => response,
                Err(err) => {
                    error!("Query failed for {} {}: {}", stage, describe(server), err);
                    if config.candidate_policy == CandidatePolicy::FallThrough
                        && !candidates.is_empty()
                    {
                        debug!("trying the next {} candidate", stage);
                        continue;
                    }
                    return Err(Error::QueryFailed { stage, server });
                }
            };
            info!("Querying {} server ({}) - SUCCESS", stage, describe(server));

            if !response.answers.is_empty() {
                let address = response
                    .first_address()
                    .ok_or(Error::NoAddressInAnswer { server })?;
                info!("resolved {} to {} after {} queries", domain, address, hops.len());
                return Ok(Resolution {
                    domain: domain.to_owned(),
                    address,
                    hops,
                });
            }

            referrals += 1;
            if referrals > config.max_referrals {
                error!("giving up on {} after {} referrals", domain, config.max_referrals);
                return Err(Error::TooManyReferrals(config.max_referrals));
            }

            candidates = extract_next_nameservers(&self.hosts, &response)
                .await
                .into();
            if candidates.is_empty() {
                error!("Resolution failed.");
                return Err(Error::ExhaustedCandidates { stage });
            }
            debug!("{} candidates for the next tier: {:?}", candidates.len(), candidates);
            stage = stage.next();
        }
    }
}

fn describe(server: Ipv4Addr) -> String {
    match ROOT_SERVERS.iter().find(|root| root.addr == server) {
        Some(root) => format!("{} {}", server, root.label),
        None => server.to_string(),
    }
}
