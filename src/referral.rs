//! Turning a referral into the next tier's nameserver addresses.

use std::future::Future;
use std::net::Ipv4Addr;

use log::{debug, error, warn};

use crate::error::{Error, LookupError};
use crate::message::DnsMessage;

/// A plain, non-iterative hostname to IPv4 lookup.
pub trait HostResolver: Sync {
    fn resolve_ipv4(
        &self,
        host: &str,
    ) -> impl Future<Output = Result<Vec<Ipv4Addr>, LookupError>> + Send;
}

impl<R: HostResolver + ?Sized> HostResolver for &R {
    fn resolve_ipv4(
        &self,
        host: &str,
    ) -> impl Future<Output = Result<Vec<Ipv4Addr>, LookupError>> + Send {
        (**self).resolve_ipv4(host)
    }
}

fn nameserver_names(message: &DnsMessage) -> Result<Vec<&str>, Error> {
    if message.authority.is_empty() {
        return Err(Error::NoAuthoritySection);
    }
    Ok(message.authority_nameservers())
}

fn report(err: &Error) {
    match *err {
        Error::NameserverUnresolvable {
            ref name,
            source: LookupError::NxDomain,
        } => warn!("Nameserver {} does not exist.", name),
        Error::NameserverUnresolvable {
            ref name,
            source: LookupError::NoAnswer,
        } => warn!("No A record found for nameserver {}.", name),
        Error::NameserverUnresolvable {
            ref name,
            source: LookupError::Timeout,
        } => error!("Timeout while resolving NS {}.", name),
        ref err => error!("{}", err),
    }
}

/// Resolves the NS hostnames named in `message`'s authority section.
///
/// Addresses keep the order of the NS records, and within one hostname the
/// order the resolver returned them in. Hostnames that fail to resolve are
/// logged and skipped. The result is empty when there is no authority
/// section, no NS record in it, or no hostname resolved.
pub async fn extract_next_nameservers<R: HostResolver>(
    resolver: &R,
    message: &DnsMessage,
) -> Vec<Ipv4Addr> {
    let names = match nameserver_names(message) {
        Ok(names) => names,
        Err(err) => {
            report(&err);
            return Vec::new();
        }
    };
    for name in &names {
        debug!("Extracted NS hostname: {}", name);
    }

    let mut addrs = Vec::new();
    for name in names {
        match resolver.resolve_ipv4(name).await {
            Ok(resolved) => {
                for ip in resolved {
                    debug!("Resolved {} to {}", name, ip);
                    addrs.push(ip);
                }
            }
            Err(source) => report(&Error::NameserverUnresolvable {
                name: name.to_owned(),
                source,
            }),
        }
    }
    addrs
}
