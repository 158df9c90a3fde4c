//! # DNSProbe Resolver
//!
//! A blocking, single-shot DNS client over UDP.
//!
//! One call sends one query datagram, waits for one response datagram and decodes it.
//! There is no retry, no failover between servers, no TCP fallback and no EDNS(0):
//! whatever the queried server answers is what the caller gets.
//!
//! The socket sits behind the [`Transport`] trait, so the resolver can be driven by
//! anything that moves bytes ([`UdpTransport`] in production, a scripted transport
//! in tests).
//!
//! ## Example
//!
//! ```rust,no_run
//! use dnsprobe::dns::message::{QuerySpec, QueryType};
//! use dnsprobe::dns::resolver::{Resolver, ResolverConfig};
//! use dnsprobe::dns::resolver::transporter::resolve_server;
//!
//! let server = resolve_server("8.8.8.8", 53).unwrap();
//! let mut resolver = Resolver::connect(&ResolverConfig::new(server)).unwrap();
//!
//! let exchange = resolver
//!     .query(&QuerySpec::new("www.github.com", QueryType::A, true))
//!     .unwrap();
//! println!("{}", exchange.message);
//! ```
//!
//! ## Error Handling
//!
//! - [`ResolverErrors`] - top-level error returned by [`Resolver::query`].
//! - [`UdpErrors`] - socket failures (bind, send, receive, timeout).
//! - [`WireErrors`] - the query could not be encoded or the response could not be decoded.
pub mod transporter;

use crate::dns::WireErrors;
use crate::dns::message::{DnsMessage, MAX_UDP_PAYLOAD, QueryMessage, QuerySpec};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default read/write timeout applied by [`UdpTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Moves one query to the server and one response back.
pub trait Transport {
    /// Sends `query` and writes the reply into `response`, returning its length.
    fn exchange(&mut self, query: &[u8], response: &mut [u8]) -> Result<usize, UdpErrors>;
}

/// A connected UDP socket.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds an ephemeral socket of the server's address family and connects it.
    pub fn connect(server: SocketAddr, timeout: Option<Duration>) -> Result<Self, UdpErrors> {
        let local: SocketAddr = match server {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)?;
        socket.set_read_timeout(timeout)?;
        socket.set_write_timeout(timeout)?;
        socket
            .connect(server)
            .map_err(|e| UdpErrors::Unreachable(server, e))?;

        debug!(%server, local = ?socket.local_addr().ok(), "UDP transport connected");
        Ok(Self { socket })
    }
}

impl Transport for UdpTransport {
    fn exchange(&mut self, query: &[u8], response: &mut [u8]) -> Result<usize, UdpErrors> {
        self.socket
            .send(query)
            .map_err(UdpErrors::CouldNotSendMessage)?;
        self.socket.recv(response).map_err(UdpErrors::NoResponse)
    }
}

/// Where and how to reach the DNS server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub server: SocketAddr,
    /// `None` blocks until a response arrives.
    pub timeout: Option<Duration>,
}

impl ResolverConfig {
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The raw response datagram together with its decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub query_id: u16,
    pub response: Vec<u8>,
    pub message: DnsMessage,
}

/// Single-shot resolver over a [`Transport`].
#[derive(Debug)]
pub struct Resolver<T: Transport> {
    transport: T,
}

impl Resolver<UdpTransport> {
    /// Connects a UDP transport to `config.server`.
    pub fn connect(config: &ResolverConfig) -> Result<Self, ResolverErrors> {
        let transport = UdpTransport::connect(config.server, config.timeout)?;
        Ok(Resolver::new(transport))
    }
}

impl<T: Transport> Resolver<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends the query described by `spec` and decodes the answer.
    ///
    /// A response whose id differs from the query id is still decoded; the
    /// mismatch is only logged.
    ///
    /// # Errors
    /// - [`ResolverErrors::BuildQuery`] when the name cannot be encoded.
    /// - [`ResolverErrors::Udp`] when the exchange fails.
    /// - [`ResolverErrors::DecodeResponse`] when the response is malformed.
    pub fn query(&mut self, spec: &QuerySpec) -> Result<Exchange, ResolverErrors> {
        let query = QueryMessage::new(spec);
        let query_id = query.header.id;
        let bytes = query.encode().map_err(ResolverErrors::BuildQuery)?;

        let mut buf = [0u8; MAX_UDP_PAYLOAD];
        let len = self.transport.exchange(&bytes, &mut buf)?;
        let response = &buf[..len.min(buf.len())];
        debug!(len = response.len(), "received DNS response");

        let message = DnsMessage::decode(response).map_err(ResolverErrors::DecodeResponse)?;

        if !internal::check_response_id(message.header.id, query_id) {
            warn!(
                expected = query_id,
                received = message.header.id,
                "response id does not match the query id"
            );
        }
        if message.header.flags.tc {
            warn!("response is truncated (TC set), showing what fits in {MAX_UDP_PAYLOAD} bytes");
        }

        Ok(Exchange {
            query_id,
            response: response.to_vec(),
            message,
        })
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Represents errors that may occur when sending or receiving DNS queries over UDP.
#[derive(Debug, Error)]
pub enum UdpErrors {
    #[error("Socket error: {0}")]
    SocketIo(#[from] std::io::Error),
    #[error("DNS server {0} unreachable: {1}")]
    Unreachable(SocketAddr, #[source] std::io::Error),
    #[error("Could not send the DNS message over UDP: {0}")]
    CouldNotSendMessage(#[source] std::io::Error),
    #[error("Could not get a DNS response from the name server: {0}")]
    NoResponse(#[source] std::io::Error),
}

/// Represents high-level resolver errors exposed to users.
#[derive(Debug, Error)]
pub enum ResolverErrors {
    #[error("Could not build the DNS query: {0}")]
    BuildQuery(#[source] WireErrors),
    #[error(transparent)]
    Udp(#[from] UdpErrors),
    #[error("Could not decode the DNS response: {0}")]
    DecodeResponse(#[source] WireErrors),
}

mod internal {
    pub(crate) fn check_response_id(received: u16, sent: u16) -> bool {
        received == sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::message::{QueryType, RecordType};
    use crate::dns::name::encode_name;
    use std::io;
    use std::thread;

    /// Answers every query with a response built from the query bytes.
    struct ScriptedTransport<F: FnMut(&[u8]) -> Result<Vec<u8>, UdpErrors>> {
        respond: F,
        sent: Vec<Vec<u8>>,
    }

    impl<F: FnMut(&[u8]) -> Result<Vec<u8>, UdpErrors>> Transport for ScriptedTransport<F> {
        fn exchange(&mut self, query: &[u8], response: &mut [u8]) -> Result<usize, UdpErrors> {
            self.sent.push(query.to_vec());
            let reply = (self.respond)(query)?;
            let len = reply.len().min(response.len());
            response[..len].copy_from_slice(&reply[..len]);
            Ok(len)
        }
    }

    fn scripted<F: FnMut(&[u8]) -> Result<Vec<u8>, UdpErrors>>(respond: F) -> ScriptedTransport<F> {
        ScriptedTransport {
            respond,
            sent: Vec::new(),
        }
    }

    /// Turns a query into a response carrying one A record for the question name.
    fn answer_a(query: &[u8], address: [u8; 4]) -> Vec<u8> {
        let mut response = query.to_vec();
        response[2] |= 0x80; // QR
        response[3] |= 0x80; // RA
        response[7] = 1; // ANCOUNT
        response.extend_from_slice(&[0xC0, 0x0C, 0, 1, 0, 1, 0, 0, 0x0E, 0x10, 0, 4]);
        response.extend_from_slice(&address);
        response
    }

    #[test]
    fn test_resolver_query_a() {
        let transport = scripted(|q| Ok(answer_a(q, [140, 82, 121, 4])));
        let mut resolver = Resolver::new(transport);

        let exchange = resolver
            .query(&QuerySpec::new("github.com", QueryType::A, true))
            .unwrap();

        assert_eq!(exchange.message.header.id, exchange.query_id);
        assert_eq!(exchange.message.question().unwrap().name, "github.com.");
        assert_eq!(exchange.message.answers.len(), 1);
        assert_eq!(exchange.message.answers[0].record_type, RecordType::A);
        assert_eq!(exchange.message.answers[0].value, "140.82.121.4");
        assert_eq!(exchange.message.answers[0].ttl, 3600);

        let transport = resolver.into_transport();
        assert_eq!(transport.sent.len(), 1);
        let sent = &transport.sent[0];
        assert_eq!(sent.len(), 12 + encode_name("github.com").unwrap().len() + 4);
        assert_eq!(&sent[2..4], &[0x01, 0x00]);
        assert_eq!(exchange.response.len(), sent.len() + 16);
    }

    #[test]
    fn test_resolver_id_mismatch_is_not_fatal() {
        let transport = scripted(|q| {
            let mut r = answer_a(q, [10, 0, 0, 1]);
            r[0] = !r[0];
            Ok(r)
        });
        let exchange = Resolver::new(transport)
            .query(&QuerySpec::new("example.com", QueryType::A, false))
            .unwrap();
        assert_ne!(exchange.message.header.id, exchange.query_id);
        assert_eq!(exchange.message.answers[0].value, "10.0.0.1");
    }

    #[test]
    fn test_resolver_build_error() {
        let transport = scripted(|_| panic!("nothing should be sent"));
        let result = Resolver::new(transport).query(&QuerySpec::new(
            "a".repeat(64),
            QueryType::A,
            true,
        ));
        assert!(matches!(
            result,
            Err(ResolverErrors::BuildQuery(WireErrors::LabelTooLong(_)))
        ));
    }

    #[test]
    fn test_resolver_decode_error() {
        let transport = scripted(|q| {
            let mut r = answer_a(q, [10, 0, 0, 1]);
            r.truncate(r.len() - 2);
            Ok(r)
        });
        let result = Resolver::new(transport).query(&QuerySpec::new("example.com", QueryType::A, true));
        assert!(matches!(
            result,
            Err(ResolverErrors::DecodeResponse(WireErrors::TruncatedMessage { .. }))
        ));
    }

    #[test]
    fn test_resolver_transport_error() {
        let transport = scripted(|_| {
            Err(UdpErrors::NoResponse(io::Error::new(
                io::ErrorKind::TimedOut,
                "timed out",
            )))
        });
        let result = Resolver::new(transport).query(&QuerySpec::new("example.com", QueryType::A, true));
        assert!(matches!(result, Err(ResolverErrors::Udp(UdpErrors::NoResponse(_)))));
    }

    #[test]
    fn test_resolver_udp_loopback() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let server_addr = server.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 512];
            let (len, peer) = server.recv_from(&mut buf).unwrap();
            let response = answer_a(&buf[..len], [127, 0, 0, 53]);
            server.send_to(&response, peer).unwrap();
        });

        let config = ResolverConfig::new(server_addr).with_timeout(Some(Duration::from_secs(5)));
        let mut resolver = Resolver::connect(&config).unwrap();
        let exchange = resolver
            .query(&QuerySpec::new("loopback.test", QueryType::A, true))
            .unwrap();
        handle.join().unwrap();

        assert_eq!(exchange.message.header.id, exchange.query_id);
        assert_eq!(exchange.message.answers[0].name, "loopback.test.");
        assert_eq!(exchange.message.answers[0].value, "127.0.0.53");
    }

    #[test]
    fn test_resolver_udp_timeout() {
        // Bound but silent server.
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let config = ResolverConfig::new(server.local_addr().unwrap())
            .with_timeout(Some(Duration::from_millis(100)));

        let result = Resolver::connect(&config)
            .unwrap()
            .query(&QuerySpec::new("example.com", QueryType::A, true));
        assert!(matches!(result, Err(ResolverErrors::Udp(UdpErrors::NoResponse(_)))));
    }

    #[test]
    fn test_resolver_config_defaults() {
        let server: SocketAddr = "9.9.9.9:53".parse().unwrap();
        let config = ResolverConfig::new(server);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
        assert_eq!(config.with_timeout(None).timeout, None);
    }
}
