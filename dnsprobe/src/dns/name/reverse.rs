//! Reverse-lookup name synthesis (RFC 1035 §3.5, RFC 3596 §2.5).
//!
//! - `192.0.2.1` becomes `1.2.0.192.in-addr.arpa`
//! - `2001:db8::1` becomes the 32 nibbles of the fully expanded address, last
//!   nibble first, followed by `ip6.arpa`
use crate::dns::WireErrors;
use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Builds the PTR query name for an IPv4 or IPv6 literal.
///
/// IPv4 parsing is attempted first, then IPv6. The result has no trailing dot.
///
/// # Errors
/// Returns [`WireErrors::InvalidAddress`] if `ip_address` is neither.
///
/// # Example
/// ```rust
/// use dnsprobe::dns::name::build_ptr_query;
///
/// assert_eq!(build_ptr_query("192.0.2.1").unwrap(), "1.2.0.192.in-addr.arpa");
/// assert!(build_ptr_query("not an ip").is_err());
/// ```
pub fn build_ptr_query(ip_address: &str) -> Result<String, WireErrors> {
    let address = ip_address
        .parse::<Ipv4Addr>()
        .map(IpAddr::V4)
        .or_else(|_| ip_address.parse::<Ipv6Addr>().map(IpAddr::V6))
        .map_err(|_| WireErrors::InvalidAddress(ip_address.to_string()))?;

    Ok(match address {
        IpAddr::V4(v4) => reverse_ipv4(v4),
        IpAddr::V6(v6) => reverse_ipv6(v6),
    })
}

/// `a.b.c.d` -> `d.c.b.a.in-addr.arpa`
pub fn reverse_ipv4(address: Ipv4Addr) -> String {
    let mut name = String::with_capacity(29);
    for octet in address.octets().iter().rev() {
        let _ = write!(name, "{}.", octet);
    }
    name.push_str("in-addr.arpa");
    name
}

/// Expands `address` to eight 4-digit hextets and emits every nibble in reverse
/// order, each followed by a dot, then `ip6.arpa`.
pub fn reverse_ipv6(address: Ipv6Addr) -> String {
    let mut name = String::with_capacity(72);
    for segment in address.segments().iter().rev() {
        let hextet = format!("{:04x}", segment);
        for nibble in hextet.chars().rev() {
            name.push(nibble);
            name.push('.');
        }
    }
    name.push_str("ip6.arpa");
    name
}
