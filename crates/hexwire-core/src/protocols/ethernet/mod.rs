//! Ethernet II link header decoding.

pub mod layout;
pub mod parser;

pub use parser::{EthernetHeader, parse_ethernet};
