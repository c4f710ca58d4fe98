//! Scripted stand-ins for the network and the system resolver.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;

use crate::dns_parser::{self, Builder, Class, Name, Packet, QueryClass, QueryType, RRData};
use crate::error::LookupError;
use crate::referral::HostResolver;
use crate::transport::Transport;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proto {
    Udp,
    Tcp,
}

/// How a fake server reacts to one query.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Never answers.
    Hang,
    /// Fails at the socket level.
    Refused,
    /// Sends bytes that are not a DNS message.
    Garbage,
    /// Answers with an id that does not match the query.
    WrongId,
    /// Keeps the id but answers a question about another name.
    WrongQuestion,
    /// Sets the TC bit.
    Truncated,
    /// Answers with an A record.
    Answer(Ipv4Addr),
    /// Answers with a CNAME and nothing else.
    CnameOnly,
    /// Refers to the given nameservers through the authority section.
    Referral(Vec<&'static str>),
    /// No answer and no authority records.
    Empty,
}

impl Reply {
    fn render(&self, query: &[u8]) -> io::Result<Vec<u8>> {
        let packet = Packet::parse(query).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let qname = &packet.questions[0].qname;
        let id = packet.header.id;
        let question = |id| {
            Builder::new_response(id, false, false)
                .add_question(qname, QueryType::A, QueryClass::IN)
        };
        let wire = match *self {
            Reply::Hang => unreachable!("hanging replies are never rendered"),
            Reply::Refused => return Err(io::ErrorKind::ConnectionRefused.into()),
            Reply::Garbage => return Ok(vec![0xde, 0xad]),
            Reply::WrongId => question(id.wrapping_add(1)).build(),
            Reply::WrongQuestion => {
                let other = Name::from_str("other.test");
                Builder::new_response(id, false, false)
                    .add_question(&other, QueryType::A, QueryClass::IN)
                    .add_answer(&other, Class::IN, 300, &RRData::A(Ipv4Addr::new(10, 9, 9, 9)))
                    .build()
            }
            Reply::Truncated => {
                let mut builder = question(id).move_to::<dns_parser::Answers>();
                builder.set_max_size(Some(0));
                builder.build()
            }
            Reply::Answer(ip) => question(id)
                .add_answer(qname, Class::IN, 300, &RRData::A(ip))
                .build(),
            Reply::CnameOnly => question(id)
                .add_answer(qname, Class::IN, 300, &RRData::CNAME(Name::from_str("alias.test")))
                .build(),
            Reply::Referral(ref hosts) => {
                let zone = Name::from_str("test");
                let mut builder = question(id).move_to::<dns_parser::Nameservers>();
                for host in hosts {
                    builder = builder.add_nameserver(
                        &zone,
                        Class::IN,
                        172800,
                        &RRData::NS(Name::from_str(*host)),
                    );
                }
                builder.build()
            }
            Reply::Empty => question(id).build(),
        };
        Ok(wire.unwrap_or_else(|truncated| truncated))
    }
}

async fn respond(reply: Option<Reply>, query: &[u8]) -> io::Result<Vec<u8>> {
    match reply {
        None | Some(Reply::Hang) => std::future::pending().await,
        Some(reply) => reply.render(query),
    }
}

type Script = Mutex<HashMap<Ipv4Addr, VecDeque<Reply>>>;

/// Servers that follow a per-address script. A server with nothing left to
/// say hangs.
#[derive(Debug, Default)]
pub struct FakeNetwork {
    udp: Script,
    tcp: Script,
    sent: Mutex<Vec<(Proto, Ipv4Addr)>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn udp(self, server: Ipv4Addr, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.udp.lock().unwrap().entry(server).or_default().extend(replies);
        self
    }

    pub fn tcp(self, server: Ipv4Addr, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.tcp.lock().unwrap().entry(server).or_default().extend(replies);
        self
    }

    /// Every query seen so far, in order.
    pub fn sent(&self) -> Vec<(Proto, Ipv4Addr)> {
        self.sent.lock().unwrap().clone()
    }

    fn next(&self, proto: Proto, server: SocketAddr) -> Option<Reply> {
        let ip = match server.ip() {
            IpAddr::V4(ip) => ip,
            IpAddr::V6(_) => panic!("fake network is IPv4 only"),
        };
        self.sent.lock().unwrap().push((proto, ip));
        let script = match proto {
            Proto::Udp => &self.udp,
            Proto::Tcp => &self.tcp,
        };
        script.lock().unwrap().get_mut(&ip).and_then(VecDeque::pop_front)
    }
}

impl Transport for FakeNetwork {
    async fn send_udp(&self, query: &[u8], server: SocketAddr) -> io::Result<Vec<u8>> {
        respond(self.next(Proto::Udp, server), query).await
    }

    async fn send_tcp(&self, query: &[u8], server: SocketAddr) -> io::Result<Vec<u8>> {
        respond(self.next(Proto::Tcp, server), query).await
    }
}

/// A system resolver with a fixed table of answers.
#[derive(Debug, Default)]
pub struct FakeResolver {
    table: HashMap<String, Result<Vec<Ipv4Addr>, LookupError>>,
    asked: Mutex<Vec<String>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, name: &str, addrs: &[Ipv4Addr]) -> Self {
        self.table.insert(name.to_owned(), Ok(addrs.to_vec()));
        self
    }

    pub fn failing(mut self, name: &str, err: LookupError) -> Self {
        self.table.insert(name.to_owned(), Err(err));
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl HostResolver for FakeResolver {
    async fn resolve_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, LookupError> {
        self.asked.lock().unwrap().push(host.to_owned());
        self.table
            .get(host)
            .cloned()
            .unwrap_or(Err(LookupError::NxDomain))
    }
}
