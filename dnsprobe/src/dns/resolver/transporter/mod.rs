//! # DNS Transporter
//!
//! Turns the server given on the command line (`-s`) into the socket address the
//! UDP transport connects to.
//!
//! - An IPv4 or IPv6 literal is used as-is with the requested port.
//! - Anything else is treated as a host name and looked up through the system
//!   resolver; the first IPv4 or IPv6 address returned wins.
//!
//! There is exactly one server per query: no list, no failover.
//!
//! ## Example
//!
//! ```rust
//! use dnsprobe::dns::resolver::transporter::resolve_server;
//!
//! let addr = resolve_server("8.8.8.8", 53).unwrap();
//! assert_eq!(addr.to_string(), "8.8.8.8:53");
//!
//! let addr = resolve_server("[2001:4860:4860::8888]", 5353).unwrap();
//! assert_eq!(addr.port(), 5353);
//! ```
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use thiserror::Error;
use tracing::debug;

/// Standard DNS port.
pub const DEFAULT_PORT: u16 = 53;

/// Resolves `server` (IP literal or host name) and `port` to a socket address.
///
/// Square brackets around an IPv6 literal are accepted.
///
/// # Errors
/// - [`TransporterErrors::InvalidServer`] for an empty server or port 0.
/// - [`TransporterErrors::Lookup`] if the host name cannot be resolved.
/// - [`TransporterErrors::NoAddress`] if the lookup returns nothing usable.
pub fn resolve_server(server: &str, port: u16) -> Result<SocketAddr, TransporterErrors> {
    let host = server.trim().trim_matches(['[', ']'].as_ref());
    if host.is_empty() || port == 0 {
        return Err(TransporterErrors::InvalidServer(format!("{}:{}", server, port)));
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransporterErrors::Lookup {
            server: host.to_string(),
            source,
        })?
        .find(|addr| addr.is_ipv4() || addr.is_ipv6())
        .ok_or_else(|| TransporterErrors::NoAddress(host.to_string()))?;

    debug!(server = host, %addr, "resolved DNS server address");
    Ok(addr)
}

/// Errors that can occur when resolving the DNS server address.
#[derive(Debug, Error)]
pub enum TransporterErrors {
    /// Raised when the server or port cannot possibly form a valid [`SocketAddr`].
    #[error("The server {0} is invalid")]
    InvalidServer(String),
    #[error("Cannot fetch the DNS server {server}: {source}")]
    Lookup {
        server: String,
        #[source]
        source: std::io::Error,
    },
    #[error("DNS server {0} not found")]
    NoAddress(String),
}
