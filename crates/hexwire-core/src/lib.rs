//! HexWire core library for raw frame dissection.
//!
//! This crate implements the pipeline used by the CLI: packet sources feed
//! the session loop, which drives the header decoders (layout/parser over a
//! shared bounds-checked cursor) and renders one hex+ASCII report per frame.
//! Decoding is byte-oriented and side-effect free; all I/O is isolated in
//! `source` modules and the report sink.
//!
//! Invariants:
//! - Every field read out of a captured frame is bounds-checked first; a
//!   truncated or lying header aborts that frame only.
//! - The protocol counters are the only state carried across frames, and
//!   `total` moves exactly once per frame handed to the dissector.
//! - Reports are written as one unit per frame, in a fixed section order.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use hexwire_core::{PcapFileSource, run_session};
//!
//! let source = PcapFileSource::open(Path::new("capture.pcap"))?;
//! let mut log = Vec::new();
//! let summary = run_session(source, &mut log, |_| {})?;
//! println!("dissected {} frames", summary.counters.total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod counters;
mod dissect;
pub mod protocols;
mod render;
mod session;
mod source;

pub use counters::ProtocolCounters;
pub use dissect::{Dissection, ProtocolClass, Transport, dissect, ip_protocol};
pub use protocols::DissectError;
pub use protocols::ethernet::EthernetHeader;
pub use protocols::icmp::IcmpHeader;
pub use protocols::ipv4::Ipv4Header;
pub use protocols::tcp::{TcpFlags, TcpHeader};
pub use protocols::udp::UdpHeader;
pub use render::{HexDumpLines, hex_dump, write_malformed, write_report};
pub use session::{SessionError, SessionSummary, run_session};
#[cfg(target_os = "linux")]
pub use source::RawSocketSource;
pub use source::{FrameEvent, LinkKind, PacketSource, PcapFileSource, SourceError};

/// Largest frame a capture source will hand to the dissector.
pub const MAX_FRAME_LEN: usize = 65536;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";
