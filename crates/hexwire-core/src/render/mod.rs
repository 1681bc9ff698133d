//! Textual report rendering.
//!
//! `hexdump` produces the canonical hex+ASCII lines; `emitter` composes
//! decoded headers and dump sections into one report per frame.

pub mod emitter;
pub mod hexdump;

pub use emitter::{write_malformed, write_report};
pub use hexdump::{HexDumpLines, hex_dump};
