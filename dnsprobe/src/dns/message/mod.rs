//! # DNS Message Model
//!
//! Types shared by the query builder and the response parser, modelled on the
//! RFC 1035 §4.1 message layout:
//!
//! ```text
//!     +---------------------+
//!     |        Header       |
//!     +---------------------+
//!     |       Question      | the question for the name server
//!     +---------------------+
//!     |        Answer       | RRs answering the question
//!     +---------------------+
//!     |      Authority      | RRs pointing toward an authority
//!     +---------------------+
//!     |      Additional     | RRs holding additional information
//!     +---------------------+
//! ```
//!
//! - [`QuerySpec`] describes what to ask; [`builder::QueryMessage`] turns it into bytes.
//! - [`DnsMessage`] is the decoded response produced by [`DnsMessage::decode`].
pub mod builder;
pub mod parser;

pub use self::builder::{QueryMessage, generate_id};
pub use self::parser::decode_record;

use std::fmt::Display;

/// Size of the fixed DNS header.
pub const HEADER_LEN: usize = 12;
/// Largest UDP payload accepted without EDNS0.
pub const MAX_UDP_PAYLOAD: usize = 512;
/// The Internet class.
pub const CLASS_IN: u16 = 1;

/// What to ask the server: one name, one type.
///
/// PTR queries carry the already reversed `arpa` name as `domain`
/// (see [`crate::dns::name::build_ptr_query`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    domain: String,
    record_type: QueryType,
    recursion_desired: bool,
}

impl QuerySpec {
    pub fn new(domain: impl Into<String>, record_type: QueryType, recursion_desired: bool) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            recursion_desired,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn record_type(&self) -> QueryType {
        self.record_type
    }

    pub fn recursion_desired(&self) -> bool {
        self.recursion_desired
    }
}

/// Record types that can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    // A host address
    A = 1,
    // A domain name pointer
    Ptr = 12,
    // An IPv6 host address
    Aaaa = 28,
}

impl QueryType {
    /// Encode the query type as a 2-byte big-endian value.
    pub fn to_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }
}

impl From<QueryType> for RecordType {
    fn from(value: QueryType) -> Self {
        match value {
            QueryType::A => RecordType::A,
            QueryType::Ptr => RecordType::Ptr,
            QueryType::Aaaa => RecordType::Aaaa,
        }
    }
}

/// TYPE values understood by the parser. Anything else decodes to `Unsupported`
/// carrying the raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Ns,
    Cname,
    Ptr,
    Aaaa,
    Unsupported(u16),
}

impl RecordType {
    pub fn code(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Ns => 2,
            RecordType::Cname => 5,
            RecordType::Ptr => 12,
            RecordType::Aaaa => 28,
            RecordType::Unsupported(code) => code,
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, RecordType::Unsupported(_))
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Ns => "NS",
            RecordType::Cname => "CNAME",
            RecordType::Ptr => "PTR",
            RecordType::Aaaa => "AAAA",
            RecordType::Unsupported(_) => "UNSUPPORTED",
        }
    }
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            1 => RecordType::A,
            2 => RecordType::Ns,
            5 => RecordType::Cname,
            12 => RecordType::Ptr,
            28 => RecordType::Aaaa,
            other => RecordType::Unsupported(other),
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents the header section of a DNS message.
///
/// The header contains an ID, flags, and counts for each section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeaderSection {
    /// Identifier to match requests and responses.
    pub id: u16,
    /// Flags and control bits for the DNS message.
    pub flags: DnsHeaderFlags,
    /// Number of entries in the question section.
    pub qd_count: u16,
    /// Number of resource records in the answer section.
    pub an_count: u16,
    /// Number of name server records in the authority section.
    pub ns_count: u16,
    /// Number of resource records in the additional section.
    pub ar_count: u16,
}

#[allow(clippy::wrong_self_convention)]
impl HeaderSection {
    /// Converts the header into a 12-byte array suitable for network transmission.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..2].copy_from_slice(&self.id.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.flags.to_u16().to_be_bytes());
        bytes[4..6].copy_from_slice(&self.qd_count.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.an_count.to_be_bytes());
        bytes[8..10].copy_from_slice(&self.ns_count.to_be_bytes());
        bytes[10..12].copy_from_slice(&self.ar_count.to_be_bytes());
        bytes
    }

    /// Reads the header from the first 12 bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let word = |i: usize| u16::from_be_bytes([bytes[i], bytes[i + 1]]);
        Self {
            id: word(0),
            flags: DnsHeaderFlags::from_u16(word(2)),
            qd_count: word(4),
            an_count: word(6),
            ns_count: word(8),
            ar_count: word(10),
        }
    }
}

/// Represents the 16-bit DNS flags field (RFC 1035 §4.1.1).
///
/// ```text
///   0  1  2  3  4  5  6  7  8  9  A  B  C  D  E  F
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DnsHeaderFlags {
    /// Query/Response flag
    pub qr: bool,
    /// Operation code
    /// Use `OpCodeOptions`
    pub opcode: u8,
    /// Authoritative Answer
    pub aa: bool,
    /// Truncation flag
    pub tc: bool,
    /// Recursion Desired
    pub rd: bool,
    /// Recursion Available
    pub ra: bool,
    /// Reserved bits (RFC 1035)
    pub z: u8,
    /// Response code
    pub rcode: u8,
}

// 3-15 reserved for future use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodeOptions {
    StandardQuery = 0,
    InverseQuery = 1,
    ServerStatusRequest = 2,
}

impl DnsHeaderFlags {
    /// Encode the flags into a 16-bit integer.
    pub fn to_u16(self) -> u16 {
        ((self.qr as u16) << 15)
            | ((self.opcode as u16 & 0b1111) << 11)
            | ((self.aa as u16) << 10)
            | ((self.tc as u16) << 9)
            | ((self.rd as u16) << 8)
            | ((self.ra as u16) << 7)
            | ((self.z as u16 & 0b111) << 4)
            | (self.rcode as u16 & 0b1111)
    }

    /// Decode from a 16-bit integer into structured flags.
    pub fn from_u16(value: u16) -> Self {
        Self {
            qr: (value >> 15) & 1 != 0,
            opcode: ((value >> 11) & 0b1111) as u8,
            aa: (value >> 10) & 1 != 0,
            tc: (value >> 9) & 1 != 0,
            rd: (value >> 8) & 1 != 0,
            ra: (value >> 7) & 1 != 0,
            z: ((value >> 4) & 0b111) as u8,
            rcode: (value & 0b1111) as u8,
        }
    }

    pub fn response_code(self) -> ResponseCode {
        ResponseCode::from(self.rcode)
    }
}

/// RCODE values of RFC 1035 §4.1.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

impl Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseCode::NoError => write!(f, "NOERROR"),
            ResponseCode::FormErr => write!(f, "FORMERR"),
            ResponseCode::ServFail => write!(f, "SERVFAIL"),
            ResponseCode::NxDomain => write!(f, "NXDOMAIN"),
            ResponseCode::NotImp => write!(f, "NOTIMP"),
            ResponseCode::Refused => write!(f, "REFUSED"),
            ResponseCode::Other(code) => write!(f, "RCODE{}", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuestionSection {
    /// The domain name being queried, dot-terminated.
    pub name: String,
    /// The type of DNS record being requested.
    pub record_type: RecordType,
    /// The class of the DNS record (usually IN for Internet).
    pub class: u16,
}

/// A single resource record from the answer, authority or additional section.
///
/// `value` depends on the type: dotted-quad for `A`, eight colon-separated
/// 4-digit hex groups for `AAAA`, a dot-terminated name for `CNAME`/`NS`/`PTR`,
/// and empty for unsupported types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceRecord {
    /// The domain name that owns this record.
    pub name: String,
    pub record_type: RecordType,
    pub class: u16,
    /// Time-to-live of the record in seconds.
    pub ttl: u32,
    /// Length of the RDATA field.
    pub rd_length: u16,
    pub value: String,
}

/// A decoded DNS response.
///
/// Record order inside each section is the order found on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DnsMessage {
    pub header: HeaderSection,
    // The question(s) echoed by the name server
    pub questions: Vec<QuestionSection>,
    // RRs answering the question
    pub answers: Vec<ResourceRecord>,
    // RRs pointing toward an authority
    pub authorities: Vec<ResourceRecord>,
    // RRs holding additional information
    pub additionals: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// The first (normally the only) question.
    pub fn question(&self) -> Option<&QuestionSection> {
        self.questions.first()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn class_name(class: u16) -> String {
    match class {
        CLASS_IN => "IN".to_string(),
        other => format!("CLASS{}", other),
    }
}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.record_type.is_supported() {
            return write!(f, "UNSUPPORTED DNS RECORD TYPE");
        }
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.name,
            self.record_type,
            class_name(self.class),
            self.ttl,
            self.value
        )
    }
}

impl Display for DnsMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags = self.header.flags;
        writeln!(
            f,
            "Authoritative: {}, Recursive: {}, Truncated: {}, Rcode: {}",
            yes_no(flags.aa),
            yes_no(flags.rd),
            yes_no(flags.tc),
            flags.response_code()
        )?;

        writeln!(f, "Question section ({})", self.header.qd_count)?;
        for question in &self.questions {
            writeln!(
                f,
                "  {}, {}, {}",
                question.name,
                question.record_type,
                class_name(question.class)
            )?;
        }

        let sections = [
            ("Answer", self.header.an_count, &self.answers),
            ("Authority", self.header.ns_count, &self.authorities),
            ("Additional", self.header.ar_count, &self.additionals),
        ];
        for (title, count, records) in sections {
            writeln!(f, "{} section ({})", title, count)?;
            for record in records {
                writeln!(f, "  {}", record)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_to_bytes() {
        assert_eq!(QueryType::A.to_bytes(), [0x00, 0x01]);
        assert_eq!(QueryType::Aaaa.to_bytes(), [0x00, 0x1C]);
        assert_eq!(QueryType::Ptr.to_bytes(), [0x00, 0x0C]);
    }

    #[test]
    fn test_record_type_from_code() {
        for code in [1u16, 2, 5, 12, 28] {
            let record_type = RecordType::from(code);
            assert!(record_type.is_supported());
            assert_eq!(record_type.code(), code);
        }

        let mx = RecordType::from(15);
        assert_eq!(mx, RecordType::Unsupported(15));
        assert_eq!(mx.code(), 15);
        assert_eq!(mx.to_string(), "UNSUPPORTED");
        assert_eq!(RecordType::from(QueryType::Aaaa), RecordType::Aaaa);
    }

    #[test]
    fn test_dns_header_flags_encode_decode() {
        let flags = DnsHeaderFlags {
            qr: true,
            opcode: OpCodeOptions::ServerStatusRequest as u8,
            aa: true,
            tc: false,
            rd: true,
            ra: false,
            z: 3,
            rcode: 5,
        };

        let decoded = DnsHeaderFlags::from_u16(flags.to_u16());
        assert_eq!(decoded, flags);
        assert_eq!(decoded.response_code(), ResponseCode::Refused);
    }

    #[test]
    fn test_dns_header_flags_known_values() {
        // Standard recursive response, no error
        let flags = DnsHeaderFlags::from_u16(0x8180);
        assert!(flags.qr);
        assert_eq!(flags.opcode, 0);
        assert!(!flags.aa);
        assert!(!flags.tc);
        assert!(flags.rd);
        assert!(flags.ra);
        assert_eq!(flags.rcode, 0);

        // Query with only RD set
        let query = DnsHeaderFlags {
            rd: true,
            ..Default::default()
        };
        assert_eq!(query.to_u16(), 0x0100);
    }

    #[test]
    fn test_header_section_bytes() {
        let header = HeaderSection {
            id: 0xBEEF,
            flags: DnsHeaderFlags::from_u16(0x8583),
            qd_count: 1,
            an_count: 2,
            ns_count: 3,
            ar_count: 4,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes, [0xBE, 0xEF, 0x85, 0x83, 0, 1, 0, 2, 0, 3, 0, 4]);
        assert_eq!(HeaderSection::from_bytes(&bytes), header);
        assert_eq!(header.flags.response_code(), ResponseCode::NxDomain);
    }

    #[test]
    fn test_message_display() {
        let msg = DnsMessage {
            header: HeaderSection {
                id: 1,
                flags: DnsHeaderFlags::from_u16(0x8180),
                qd_count: 1,
                an_count: 2,
                ns_count: 0,
                ar_count: 0,
            },
            questions: vec![QuestionSection {
                name: "www.github.com.".to_string(),
                record_type: RecordType::A,
                class: CLASS_IN,
            }],
            answers: vec![
                ResourceRecord {
                    name: "www.github.com.".to_string(),
                    record_type: RecordType::Cname,
                    class: CLASS_IN,
                    ttl: 3600,
                    rd_length: 2,
                    value: "github.com.".to_string(),
                },
                ResourceRecord {
                    name: "github.com.".to_string(),
                    record_type: RecordType::Unsupported(16),
                    class: CLASS_IN,
                    ttl: 60,
                    rd_length: 5,
                    value: String::new(),
                },
            ],
            authorities: Vec::new(),
            additionals: Vec::new(),
        };

        let expected = "Authoritative: No, Recursive: Yes, Truncated: No, Rcode: NOERROR\n\
                        Question section (1)\n  www.github.com., A, IN\n\
                        Answer section (2)\n  www.github.com., CNAME, IN, 3600, github.com.\n\
                        \x20 UNSUPPORTED DNS RECORD TYPE\n\
                        Authority section (0)\n\
                        Additional section (0)\n";
        assert_eq!(msg.to_string(), expected);
    }
}
