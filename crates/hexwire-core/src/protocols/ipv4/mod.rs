//! IPv4 network header decoding.
//!
//! The header is variable length: `ihl` counts 32-bit words and must claim at
//! least the 20-byte minimum. Both the floor and the captured length are
//! checked before any later offset is derived from the header length.

pub mod layout;
pub mod parser;

pub use parser::{Ipv4Header, parse_ipv4};
