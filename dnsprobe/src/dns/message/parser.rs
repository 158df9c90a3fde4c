//! # Response Parser
//!
//! Decodes a complete DNS message in one linear pass:
//!
//! ```text
//! header -> question(s) -> answer -> authority -> additional
//! ```
//!
//! Section sizes come from the header counts. The input slice is never modified:
//! the parser only moves offsets through it, and every read is bounds-checked so a
//! short or lying message fails with [`WireErrors::TruncatedMessage`].
//!
//! Every resource record uses the same layout, regardless of section:
//!
//! ```text
//! NAME (inline labels or pointer, variable)
//! TYPE (2) CLASS (2) TTL (4) RDLENGTH (2)
//! RDATA (RDLENGTH)
//! ```
//!
//! RDATA therefore starts 10 bytes after the real end of NAME, whatever form NAME has.
use super::{
    DnsMessage, HEADER_LEN, HeaderSection, QuestionSection, RecordType, ResourceRecord,
};
use crate::dns::WireErrors;
use crate::dns::name::decode_name;
use std::fmt::Write;
use tracing::{debug, trace};

/// TYPE + CLASS + TTL + RDLENGTH
const RECORD_FIXED_LEN: usize = 10;

/// Cursor over an immutable message buffer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn read_slice(&mut self, len: usize) -> Result<&'a [u8], WireErrors> {
        let bytes = self
            .pos
            .checked_add(len)
            .and_then(|end| self.buf.get(self.pos..end))
            .ok_or(WireErrors::TruncatedMessage {
                offset: self.pos,
                needed: len,
                len: self.buf.len(),
            })?;
        self.pos += len;
        Ok(bytes)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, WireErrors> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, WireErrors> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Decodes the name at the cursor and moves past its on-wire form.
    pub(crate) fn read_name(&mut self) -> Result<String, WireErrors> {
        let (name, consumed) = decode_name(self.buf, self.pos)?;
        self.pos += consumed;
        Ok(name)
    }
}

impl DnsMessage {
    /// Decodes a full DNS response.
    ///
    /// # Errors
    /// Any [`WireErrors`] raised while reading the header, the questions or a
    /// record. Unsupported record types are not errors: they decode to
    /// [`RecordType::Unsupported`].
    ///
    /// # Example
    /// ```rust
    /// use dnsprobe::dns::message::DnsMessage;
    ///
    /// // Header only: id 0x0001, response, no records.
    /// let bytes = [0x00, 0x01, 0x81, 0x80, 0, 0, 0, 0, 0, 0, 0, 0];
    /// let msg = DnsMessage::decode(&bytes).unwrap();
    /// assert!(msg.header.flags.qr);
    /// assert!(msg.answers.is_empty());
    /// ```
    pub fn decode(message: &[u8]) -> Result<DnsMessage, WireErrors> {
        let mut reader = WireReader::new(message, 0);
        let header_bytes: &[u8; HEADER_LEN] = reader
            .read_slice(HEADER_LEN)?
            .try_into()
            .map_err(|_| WireErrors::TruncatedMessage {
                offset: 0,
                needed: HEADER_LEN,
                len: message.len(),
            })?;
        let header = HeaderSection::from_bytes(header_bytes);

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        for _ in 0..header.qd_count {
            let name = reader.read_name()?;
            let record_type = RecordType::from(reader.read_u16()?);
            let class = reader.read_u16()?;
            questions.push(QuestionSection {
                name,
                record_type,
                class,
            });
        }

        let mut offset = reader.position();
        let answers = decode_section(message, &mut offset, header.an_count)?;
        let authorities = decode_section(message, &mut offset, header.ns_count)?;
        let additionals = decode_section(message, &mut offset, header.ar_count)?;

        debug!(
            id = header.id,
            rcode = header.flags.rcode,
            answers = answers.len(),
            authorities = authorities.len(),
            additionals = additionals.len(),
            "decoded DNS message"
        );

        Ok(DnsMessage {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

fn decode_section(
    message: &[u8],
    offset: &mut usize,
    count: u16,
) -> Result<Vec<ResourceRecord>, WireErrors> {
    // Capacity is bounded by what the buffer could hold, not by the claimed count.
    let mut records = Vec::with_capacity((count as usize).min(message.len() / (RECORD_FIXED_LEN + 1)));
    for _ in 0..count {
        let (record, consumed) = decode_record(message, *offset)?;
        *offset += consumed;
        records.push(record);
    }
    Ok(records)
}

/// Decodes the resource record starting at `offset`.
///
/// Returns the record and the number of bytes it occupies
/// (name + `RECORD_FIXED_LEN` + RDLENGTH), i.e. the distance to the next record.
pub fn decode_record(message: &[u8], offset: usize) -> Result<(ResourceRecord, usize), WireErrors> {
    let mut reader = WireReader::new(message, offset);

    let name = reader.read_name()?;
    let record_type = RecordType::from(reader.read_u16()?);
    let class = reader.read_u16()?;
    let ttl = reader.read_u32()?;
    let rd_length = reader.read_u16()?;
    let rdata_offset = reader.position();
    let rdata = reader.read_slice(rd_length as usize)?;

    let value = match record_type {
        RecordType::A => {
            let octets: [u8; 4] = rdata.try_into().map_err(|_| WireErrors::MalformedRecord {
                record_type: "A",
                rd_length,
            })?;
            format_ipv4(octets)
        }
        RecordType::Aaaa => {
            let octets: [u8; 16] = rdata.try_into().map_err(|_| WireErrors::MalformedRecord {
                record_type: "AAAA",
                rd_length,
            })?;
            format_ipv6(octets)
        }
        // RDATA is a name that may point anywhere in the message, but its own
        // bytes must fill RDLENGTH exactly.
        RecordType::Cname | RecordType::Ns | RecordType::Ptr => {
            let (target, used) = decode_name(message, rdata_offset)?;
            if used != rdata.len() {
                return Err(WireErrors::MalformedRecord {
                    record_type: record_type.name(),
                    rd_length,
                });
            }
            target
        }
        RecordType::Unsupported(_) => String::new(),
    };

    let consumed = reader.position() - offset;

    trace!(
        offset,
        name = %name,
        record_type = %record_type,
        ttl,
        rd_length,
        value = %value,
        "decoded resource record"
    );

    Ok((
        ResourceRecord {
            name,
            record_type,
            class,
            ttl,
            rd_length,
            value,
        },
        consumed,
    ))
}

fn format_ipv4(octets: [u8; 4]) -> String {
    format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}

/// Eight big-endian groups, each as 4 lower-case hex digits, no `::` shortening.
fn format_ipv6(octets: [u8; 16]) -> String {
    let mut out = String::with_capacity(39);
    for (i, group) in octets.chunks_exact(2).enumerate() {
        if i > 0 {
            out.push(':');
        }
        let _ = write!(out, "{:04x}", u16::from_be_bytes([group[0], group[1]]));
    }
    out
}
