use std::net::Ipv4Addr;
use std::time::Duration;

pub const DNS_PORT: u16 = 53;
pub const MAX_RETRIES: u32 = 3;
pub const UDP_TIMEOUT: Duration = Duration::from_secs(3);
/// TCP is usually slower, so the fallback gets twice the UDP budget.
pub const TCP_TIMEOUT: Duration = Duration::from_secs(6);
/// Referrals followed before a resolution is abandoned.
pub const MAX_REFERRALS: usize = 16;

/// A bootstrap root server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootServer {
    pub addr: Ipv4Addr,
    pub label: &'static str,
}

pub const ROOT_SERVERS: [RootServer; 5] = [
    RootServer {
        addr: Ipv4Addr::new(198, 41, 0, 4),
        label: "Root (a.root-servers.net)",
    },
    RootServer {
        addr: Ipv4Addr::new(199, 9, 14, 201),
        label: "Root (b.root-servers.net)",
    },
    RootServer {
        addr: Ipv4Addr::new(192, 33, 4, 12),
        label: "Root (c.root-servers.net)",
    },
    RootServer {
        addr: Ipv4Addr::new(199, 7, 91, 13),
        label: "Root (d.root-servers.net)",
    },
    RootServer {
        addr: Ipv4Addr::new(192, 203, 230, 10),
        label: "Root (e.root-servers.net)",
    },
];

/// What to do when the query to a tier's first candidate fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidatePolicy {
    /// Give up. Sibling candidates at the same tier are never tried.
    #[default]
    FirstOnly,
    /// Move on to the next candidate of the same tier.
    FallThrough,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub udp_timeout: Duration,
    pub tcp_timeout: Duration,
    pub max_retries: u32,
    pub port: u16,
    /// Sleep for `backoff(attempt)` between UDP attempts. When off, the
    /// delay is only computed and logged.
    pub apply_backoff: bool,
    pub candidate_policy: CandidatePolicy,
    pub max_referrals: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            udp_timeout: UDP_TIMEOUT,
            tcp_timeout: TCP_TIMEOUT,
            max_retries: MAX_RETRIES,
            port: DNS_PORT,
            apply_backoff: true,
            candidate_policy: CandidatePolicy::default(),
            max_referrals: MAX_REFERRALS,
        }
    }
}

impl Config {
    pub fn with_udp_timeout(mut self, timeout: Duration) -> Self {
        self.udp_timeout = timeout;
        self
    }

    pub fn with_tcp_timeout(mut self, timeout: Duration) -> Self {
        self.tcp_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_backoff(mut self, apply: bool) -> Self {
        self.apply_backoff = apply;
        self
    }

    pub fn with_candidate_policy(mut self, policy: CandidatePolicy) -> Self {
        self.candidate_policy = policy;
        self
    }

    pub fn with_max_referrals(mut self, referrals: usize) -> Self {
        self.max_referrals = referrals;
        self
    }
}
