//! Hex dump of a raw datagram, 16 bytes per row prefixed by the row offset.
//!
//! ```text
//! 0000:  12 34 81 80 00 01 00 01 00 00 00 00 06 67 69 74
//! 0010:  68 75 62 03 63 6f 6d 00 00 01 00 01
//! ```
use std::fmt::Write;

const BYTES_PER_ROW: usize = 16;

/// Renders `bytes` as lower-case hex rows, each terminated by a newline.
pub fn hex_dump(bytes: &[u8]) -> String {
    let rows = bytes.len().div_ceil(BYTES_PER_ROW);
    let mut out = String::with_capacity(rows * (7 + BYTES_PER_ROW * 3 + 1));

    for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        let _ = write!(out, "{:04x}: ", row * BYTES_PER_ROW);
        for byte in chunk {
            let _ = write!(out, " {:02x}", byte);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexdump_rows() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let dump = hex_dump(&bytes);
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "0000:  00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f"
        );
        assert_eq!(lines[1], "0010:  10 11 12 13");
    }

    #[test]
    fn test_hexdump_exact_row() {
        let dump = hex_dump(&[0xFF; 16]);
        assert_eq!(dump.lines().count(), 1);
        assert!(dump.ends_with("ff\n"));
    }

    #[test]
    fn test_hexdump_empty() {
        assert_eq!(hex_dump(&[]), "");
    }
}
