//! One query to one server: UDP with retries and backoff, then a single TCP
//! fallback.

use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::{sleep, timeout};

use crate::config::Config;
use crate::dns_parser::{Name, Packet, QueryClass, QueryType, ResponseCode};
use crate::error::Error;
use crate::message::{encode_query, DnsMessage};

/// Largest datagram we are prepared to receive.
const MAX_UDP_SIZE: usize = 65535;

/// Delay before retrying after UDP attempt `attempt` (zero based) failed.
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(16))
}

/// Raw delivery of an encoded query. Timeouts are applied by the caller.
pub trait Transport: Sync {
    fn send_udp(
        &self,
        query: &[u8],
        server: SocketAddr,
    ) -> impl Future<Output = io::Result<Vec<u8>>> + Send;

    fn send_tcp(
        &self,
        query: &[u8],
        server: SocketAddr,
    ) -> impl Future<Output = io::Result<Vec<u8>>> + Send;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_udp(
        &self,
        query: &[u8],
        server: SocketAddr,
    ) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        (**self).send_udp(query, server)
    }

    fn send_tcp(
        &self,
        query: &[u8],
        server: SocketAddr,
    ) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        (**self).send_tcp(query, server)
    }
}

/// Sends queries over real sockets.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetTransport;

impl NetTransport {
    fn udp_socket() -> io::Result<UdpSocket> {
        let addr: SockAddr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), 0).into();
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr)?;
        UdpSocket::from_std(socket.into())
    }
}

impl Transport for NetTransport {
    async fn send_udp(&self, query: &[u8], server: SocketAddr) -> io::Result<Vec<u8>> {
        let socket = Self::udp_socket()?;
        socket.send_to(query, server).await?;
        trace!("sent {} bytes to {} over UDP", query.len(), server);

        let mut buf = vec![0u8; MAX_UDP_SIZE];
        loop {
            let (len, from) = socket.recv_from(&mut buf).await?;
            if from == server {
                buf.truncate(len);
                return Ok(buf);
            }
            warn!("ignoring datagram from unexpected peer {}", from);
        }
    }

    async fn send_tcp(&self, query: &[u8], server: SocketAddr) -> io::Result<Vec<u8>> {
        let len = u16::try_from(query.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "query too large"))?;
        let mut framed = Vec::with_capacity(query.len() + 2);
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(query);

        let mut stream = TcpStream::connect(server).await?;
        stream.write_all(&framed).await?;
        trace!("sent {} bytes to {} over TCP", framed.len(), server);

        let len = stream.read_u16().await? as usize;
        let mut buf = vec![0u8; len];
        stream.read_exact(&mut buf).await?;
        Ok(buf)
    }
}

/// Drives one A query against one server through retries and fallback.
#[derive(Debug)]
pub struct QueryTransport<T> {
    transport: T,
    config: Config,
}

impl<T: Transport> QueryTransport<T> {
    pub fn new(transport: T, config: Config) -> Self {
        QueryTransport { transport, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Queries `server` for the A record of `domain`.
    ///
    /// Every failure is logged here; the caller only learns whether a
    /// response was obtained.
    pub async fn query(&self, server: Ipv4Addr, domain: &str) -> Result<DnsMessage, Error> {
        let id = rand::random::<u16>();
        let query = encode_query(id, domain)?;
        let addr = SocketAddr::new(server.into(), self.config.port);
        let retries = self.config.max_retries;

        for attempt in 0..retries {
            match self.udp_attempt(&query, id, domain, server, addr).await {
                Ok(message) => return Ok(message),
                Err(err) if err.aborts_udp() => {
                    error!("{} while querying {}", err, domain);
                    break;
                }
                Err(err) => error!("{} for {} (attempt {}/{})", err, domain, attempt + 1, retries),
            }

            if attempt + 1 < retries {
                let wait = backoff(attempt);
                if self.config.apply_backoff {
                    debug!("retrying {} in {:?}", server, wait);
                    sleep(wait).await;
                } else {
                    debug!("retrying {} immediately (backoff would be {:?})", server, wait);
                }
            }
        }

        info!("Falling back to TCP for {}...", server);
        match timeout(self.config.tcp_timeout, self.transport.send_tcp(&query, addr)).await {
            Ok(Ok(bytes)) => match decode_response(&bytes, id, domain, server) {
                Ok(message) => return Ok(message),
                Err(err) => error!("{} over TCP", err),
            },
            Ok(Err(err)) => error!("Unexpected TCP error querying {}: {}", server, err),
            Err(_) => error!("TCP query to {} timed out.", server),
        }

        Err(Error::TransportFailure { server })
    }

    async fn udp_attempt(
        &self,
        query: &[u8],
        id: u16,
        domain: &str,
        server: Ipv4Addr,
        addr: SocketAddr,
    ) -> Result<DnsMessage, Error> {
        let bytes = timeout(self.config.udp_timeout, self.transport.send_udp(query, addr))
            .await
            .map_err(|_| Error::Timeout { server })??;
        let message = decode_response(&bytes, id, domain, server)?;
        if message.truncated {
            return Err(Error::Truncated { server });
        }
        Ok(message)
    }
}

/// Decodes `bytes` and checks they answer the A query with id `id` for
/// `domain`.
fn decode_response(
    bytes: &[u8],
    id: u16,
    domain: &str,
    server: Ipv4Addr,
) -> Result<DnsMessage, Error> {
    let packet =
        Packet::parse(bytes).map_err(|source| Error::MalformedResponse { server, source })?;
    if packet.header.query || packet.header.id != id || !echoes_question(&packet, domain) {
        return Err(Error::MismatchedResponse { server });
    }
    trace!(
        "{} answered with {} answers, {} authority records",
        server,
        packet.answers.len(),
        packet.nameservers.len()
    );
    Ok(DnsMessage::from(&packet))
}

/// Error responses may leave the question section empty; everything else
/// must repeat the question asked.
fn echoes_question(packet: &Packet, domain: &str) -> bool {
    match packet.questions[..] {
        [ref question] => {
            question.qname == Name::from_str(domain)
                && question.qtype == QueryType::A
                && question.qclass == QueryClass::IN
        }
        [] => matches!(
            packet.header.response_code,
            ResponseCode::FormatError
                | ResponseCode::ServerFailure
                | ResponseCode::NotImplemented
                | ResponseCode::Refused
        ),
        _ => false,
    }
}
