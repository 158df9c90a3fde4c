//! # DNSProbe DNS Library
//!
//! RFC 1035 wire format for a single-shot DNS client.
//!
//! The library is split into a pure core and a thin transport:
//!
//! ## Modules
//!
//! - `name` - domain name encoding/decoding (with compression pointers) and
//!   reverse-lookup name synthesis (`in-addr.arpa` / `ip6.arpa`).
//! - `message` - the message model, the query builder and the response parser.
//! - `resolver` - blocking UDP transport (`std` feature, enabled by default).
//!
//! The core never touches the network: it turns a [`message::QuerySpec`] into bytes
//! and bytes into a [`message::DnsMessage`]. Build with `default-features = false`
//! to keep only this bytes-in/bytes-out core and move the datagrams yourself.
//!
//! ## Quick Example
//!
//! ```rust
//! use dnsprobe::dns::message::{DnsMessage, QueryMessage, QuerySpec, QueryType};
//! use dnsprobe::dns::name::build_ptr_query;
//!
//! let ptr_name = build_ptr_query("192.0.2.1").unwrap();
//! let spec = QuerySpec::new(ptr_name, QueryType::Ptr, true);
//! let bytes = QueryMessage::new(&spec).encode().unwrap();
//!
//! // ... send `bytes`, receive `response` ...
//! # let response = [0u8, 1, 0x81, 0x80, 0, 0, 0, 0, 0, 0, 0, 0];
//! match DnsMessage::decode(&response) {
//!     Ok(msg) => println!("{msg}"),
//!     Err(e) => eprintln!("Bad response: {e}"),
//! }
//! # assert!(bytes.len() > 12);
//! ```
mod error;
pub mod message;
pub mod name;

pub use self::error::WireErrors;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        pub mod resolver;
        pub use self::resolver::{Resolver, ResolverConfig, ResolverErrors};
    }
}
