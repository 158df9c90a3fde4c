//! # DNS Name Codec
//!
//! Converts between presentation-format domain names (`www.example.com`) and the
//! label sequences used on the wire (RFC 1035 §3.1):
//!
//! ```text
//! 3 w w w 7 e x a m p l e 3 c o m 0
//! ```
//!
//! Encoding never emits compression pointers. Decoding follows them (RFC 1035 §4.1.4),
//! so names found in a response can be read wherever the server chose to point.
//!
//! Reverse-lookup names (`in-addr.arpa` / `ip6.arpa`) are synthesized by the
//! [`reverse`] submodule.
//!
//! ## Example
//!
//! ```rust
//! use dnsprobe::dns::name::{decode_name, encode_name};
//!
//! let wire = encode_name("www.example.com").unwrap();
//! assert_eq!(wire[0], 3);
//!
//! let (name, consumed) = decode_name(&wire, 0).unwrap();
//! assert_eq!(name, "www.example.com.");
//! assert_eq!(consumed, wire.len());
//! ```
pub mod reverse;

pub use self::reverse::{build_ptr_query, reverse_ipv4, reverse_ipv6};

use crate::dns::WireErrors;

/// Maximum length of a single label (RFC 1035 §2.3.4).
pub const MAX_LABEL_LEN: usize = 63;
/// Maximum length of an encoded name, length bytes and terminator included.
pub const MAX_NAME_LEN: usize = 255;

// Top two bits of a length byte: 00 label, 11 pointer, 01/10 reserved.
const LABEL_TYPE_MASK: u8 = 0b1100_0000;
const POINTER_OFFSET_MASK: u8 = 0b0011_1111;

/// Encodes `name` into a fresh wire-format buffer.
///
/// See [`encode_name_into`].
pub fn encode_name(name: &str) -> Result<Vec<u8>, WireErrors> {
    let mut wire = Vec::with_capacity(name.len() + 2);
    encode_name_into(name, &mut wire)?;
    Ok(wire)
}

/// Appends the wire form of `name` to `message`.
///
/// A trailing dot is optional on input. Labels are split on `.` and written as a
/// length byte followed by the raw label bytes, then the zero terminator. Empty
/// labels (`a..b`) are written as-is rather than merged. `""` and `"."` encode
/// the root name as a single zero byte.
///
/// On error `message` is left untouched.
///
/// # Errors
/// - [`WireErrors::LabelTooLong`] if a label exceeds 63 bytes.
/// - [`WireErrors::NameTooLong`] if the encoded name exceeds 255 bytes.
pub fn encode_name_into(name: &str, message: &mut Vec<u8>) -> Result<(), WireErrors> {
    if name.is_empty() || name == "." {
        message.push(0);
        return Ok(());
    }

    let labels = name.strip_suffix('.').unwrap_or(name);
    let mut wire = Vec::with_capacity(labels.len() + 2);

    for label in labels.split('.') {
        if label.len() > MAX_LABEL_LEN {
            return Err(WireErrors::LabelTooLong(label.to_string()));
        }
        wire.push(label.len() as u8);
        wire.extend_from_slice(label.as_bytes());
    }
    wire.push(0);

    if wire.len() > MAX_NAME_LEN {
        return Err(WireErrors::NameTooLong(name.to_string()));
    }

    message.extend_from_slice(&wire);
    Ok(())
}

/// Reference to RFC1035, page 30 (4.1.4)
///
/// The pointer takes the form of a two octet sequence:
///
///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///   | 1  1|                OFFSET                   |
///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// The OFFSET field specifies an offset from the start of the message.
///
/// Decodes the (possibly compressed) name starting at `offset` in `message`.
///
/// Returns the name with a trailing dot (`"."` for the root) and the number of
/// bytes the name occupies at `offset`. Once a pointer is followed the count stops
/// growing: a name stored as a single pointer consumes 2 bytes, no matter how long
/// the name it points to is.
///
/// # Errors
/// - [`WireErrors::TruncatedMessage`] if a label or pointer runs past the buffer.
/// - [`WireErrors::MalformedName`] for reserved label types, pointers outside the
///   buffer, or more jumps than there are bytes in the message (a pointer loop).
/// - [`WireErrors::NameTooLong`] once the decoded name passes 255 bytes.
pub fn decode_name(message: &[u8], offset: usize) -> Result<(String, usize), WireErrors> {
    let mut name = String::new();
    let mut pos = offset;
    let mut consumed: Option<usize> = None;
    let mut jumps = 0usize;

    loop {
        let len = byte_at(message, pos)?;

        match len & LABEL_TYPE_MASK {
            LABEL_TYPE_MASK => {
                let low = byte_at(message, pos + 1)?;
                let target = (((len & POINTER_OFFSET_MASK) as usize) << 8) | low as usize;

                if consumed.is_none() {
                    consumed = Some(pos + 2 - offset);
                }

                jumps += 1;
                if jumps > message.len() || target >= message.len() {
                    return Err(WireErrors::MalformedName(pos));
                }
                pos = target;
            }
            0 => {
                if len == 0 {
                    if consumed.is_none() {
                        consumed = Some(pos + 1 - offset);
                    }
                    break;
                }

                let start = pos + 1;
                let label = message
                    .get(start..start + len as usize)
                    .ok_or(WireErrors::TruncatedMessage {
                        offset: start,
                        needed: len as usize,
                        len: message.len(),
                    })?;
                name.push_str(&String::from_utf8_lossy(label));
                name.push('.');
                // Wire form is one byte longer than the dotted text.
                if name.len() + 1 > MAX_NAME_LEN {
                    return Err(WireErrors::NameTooLong(name));
                }
                pos = start + len as usize;
            }
            _ => return Err(WireErrors::MalformedName(pos)),
        }
    }

    if name.is_empty() {
        name.push('.');
    }

    Ok((name, consumed.unwrap_or_default()))
}

fn byte_at(message: &[u8], pos: usize) -> Result<u8, WireErrors> {
    message
        .get(pos)
        .copied()
        .ok_or(WireErrors::TruncatedMessage {
            offset: pos,
            needed: 1,
            len: message.len(),
        })
}
