//! Protocol header decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets, ranges, and bit masks (source of truth)
//! - `parser`: domain-level decoding (no direct byte indexing)
//!
//! All field access goes through the shared [`cursor::Cursor`], which bounds-
//! checks every read and converts multi-byte fields from network byte order.
//! Parsers are pure and contain no I/O; sources and the session layer handle
//! acquisition and aggregation.

pub mod cursor;
pub mod error;

pub mod ethernet;
pub mod icmp;
pub mod ipv4;
pub mod tcp;
pub mod udp;

pub use error::DissectError;
