//! Query construction: header + one question, ready to be sent as a single datagram.
use super::{
    CLASS_IN, DnsHeaderFlags, HEADER_LEN, HeaderSection, OpCodeOptions, QueryType, QuerySpec,
};
use crate::dns::WireErrors;
use crate::dns::name::encode_name_into;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::debug;

/// Generates a random 16-bit ID for a DNS query.
pub fn generate_id() -> u16 {
    let mut thread_rng = rand::rng();
    let mut rng = SmallRng::from_rng(&mut thread_rng);

    rng.random::<u16>()
}

/// An outgoing standard query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMessage {
    pub header: HeaderSection,
    pub name: String,
    pub record_type: QueryType,
    pub class: u16,
}

impl QueryMessage {
    /// Creates a standard query for `spec` with a random transaction id.
    pub fn new(spec: &QuerySpec) -> Self {
        Self::with_id(spec, generate_id())
    }

    /// Creates a standard query for `spec` using `id` as transaction id.
    ///
    /// `qr=0`, `opcode=0`, `rd` from the query, `qdcount=1`, every other field zero.
    pub fn with_id(spec: &QuerySpec, id: u16) -> Self {
        QueryMessage {
            header: HeaderSection {
                id,
                flags: DnsHeaderFlags {
                    qr: false,
                    opcode: OpCodeOptions::StandardQuery as u8,
                    rd: spec.recursion_desired(),
                    ..Default::default()
                },
                qd_count: 1,
                an_count: 0,
                ns_count: 0,
                ar_count: 0,
            },
            name: spec.domain().to_string(),
            record_type: spec.record_type(),
            class: CLASS_IN,
        }
    }

    /// Encodes the query into the exact bytes to transmit:
    /// 12-byte header, uncompressed QNAME, QTYPE, QCLASS.
    ///
    /// # Errors
    /// Propagates [`WireErrors::LabelTooLong`] / [`WireErrors::NameTooLong`] from the name codec.
    pub fn encode(&self) -> Result<Vec<u8>, WireErrors> {
        let mut message: Vec<u8> = Vec::with_capacity(HEADER_LEN + self.name.len() + 6);

        message.extend_from_slice(&self.header.to_bytes());
        encode_name_into(&self.name, &mut message)?;
        message.extend_from_slice(&self.record_type.to_bytes());
        message.extend_from_slice(&self.class.to_be_bytes());

        debug!(
            id = self.header.id,
            name = %self.name,
            record_type = ?self.record_type,
            len = message.len(),
            "encoded DNS query"
        );
        Ok(message)
    }
}
