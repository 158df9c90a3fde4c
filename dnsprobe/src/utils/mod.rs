//! Presentation helpers for raw DNS messages.
pub mod hexdump;

pub use self::hexdump::hex_dump;
