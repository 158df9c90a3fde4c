//! Errors raised while encoding or decoding DNS wire data.
use thiserror::Error;

/// Failures of the name codec, the query builder and the response parser.
///
/// Every decoding failure is reported as one of these variants; the parser never
/// hands back a partially decoded message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireErrors {
    /// The text given for a reverse lookup is neither an IPv4 nor an IPv6 literal.
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),
    /// A label is longer than 63 bytes.
    #[error("Label too long (>63): {0}")]
    LabelTooLong(String),
    /// The encoded name is longer than 255 bytes.
    #[error("Name is too long (>255): {0}")]
    NameTooLong(String),
    /// A read of `needed` bytes at `offset` would go past the end of the message.
    #[error("Truncated message: {needed} byte(s) needed at offset {offset}, message is {len} byte(s)")]
    TruncatedMessage {
        offset: usize,
        needed: usize,
        len: usize,
    },
    /// Reserved label type, out of range pointer or pointer loop at `offset`.
    #[error("Malformed name at offset {0}")]
    MalformedName(usize),
    /// RDATA length does not fit the record type.
    #[error("Malformed {record_type} record: unexpected RDLENGTH {rd_length}")]
    MalformedRecord {
        record_type: &'static str,
        rd_length: u16,
    },
}
