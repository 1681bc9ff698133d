//! Frame acquisition.
//!
//! Sources hand raw link-layer frames to the session loop; all I/O lives
//! here, never in the decoders. Capture replay works everywhere; the live
//! raw-socket source is Linux-only.

mod pcap;
#[cfg(target_os = "linux")]
mod raw;

pub use pcap::PcapFileSource;
#[cfg(target_os = "linux")]
pub use raw::RawSocketSource;

use thiserror::Error;

/// Link layer of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Ethernet,
    /// Anything the dissector does not understand; skipped by the session.
    Unsupported,
}

/// One captured frame handed to the dissection pipeline.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    /// Capture timestamp in seconds since the epoch, when known.
    pub ts: Option<f64>,
    pub link: LinkKind,
    pub data: Vec<u8>,
}

pub trait PacketSource {
    /// Next captured frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {context}: {message}")]
    Capture {
        context: &'static str,
        message: String,
    },
}
