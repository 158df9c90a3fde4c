#![cfg_attr(docsrs, feature(doc_cfg))]
//! # DNSProbe
//!
//! Issue one DNS query over UDP and decode the answer into something readable.
//!
//! ## Features
//!
//! - **Name codec** - text <-> wire labels, compression pointer decoding (RFC 1035 §4.1.4)
//! - **Reverse lookups** - `in-addr.arpa` and `ip6.arpa` names from IP literals
//! - **Query builder** - header + one question for A, AAAA or PTR
//! - **Response parser** - header, question, answer, authority and additional sections,
//!   with A / AAAA / CNAME / NS / PTR records decoded and everything else marked unsupported
//!
//! ("std" feature, default)
//! - **Blocking UDP resolver** - one query, one response, no retries
//!
//! ("serde" feature)
//! - `Serialize` for every decoded type
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! dnsprobe = { version = "0.1" }
//! dnsprobe = { version = "0.1", default-features = false } # wire format only
//! ```
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # {
//! use dnsprobe::dns::message::{QuerySpec, QueryType};
//! use dnsprobe::dns::resolver::{Resolver, ResolverConfig, transporter::resolve_server};
//!
//! let server = resolve_server("8.8.8.8", 53).unwrap();
//! let mut resolver = Resolver::connect(&ResolverConfig::new(server)).unwrap();
//! let exchange = resolver
//!     .query(&QuerySpec::new("fit.vut.cz", QueryType::Aaaa, true))
//!     .unwrap();
//!
//! print!("{}", dnsprobe::utils::hex_dump(&exchange.response));
//! print!("{}", exchange.message);
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, E>`:
//!
//! - [`dns::WireErrors`] - encoding/decoding failures (`InvalidAddress`, `LabelTooLong`,
//!   `TruncatedMessage`, `MalformedName`, ...)
//! - `dns::ResolverErrors` - everything the blocking resolver can hit
//!
//! ## License
//!
//! This project is licensed under the MIT License.
pub mod dns;

pub mod utils;
