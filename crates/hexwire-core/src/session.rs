//! The capture session: source -> dissection -> report.
//!
//! One frame is read, fully dissected, and reported before the next is read.
//! The counters are the only state carried between frames; they are owned
//! here and never shared.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, warn};

use crate::DEFAULT_GENERATED_AT;
use crate::counters::ProtocolCounters;
use crate::dissect::dissect;
use crate::render::emitter::{write_malformed, write_report};
use crate::source::{LinkKind, PacketSource, SourceError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

/// Aggregated outcome of one sniffing session.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use hexwire_core::{PcapFileSource, run_session};
///
/// let source = PcapFileSource::open(Path::new("capture.pcap"))?;
/// let mut log = Vec::new();
/// let summary = run_session(source, &mut log, |_| {})?;
/// println!("{} frames", summary.counters.total);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// RFC3339 stamp derived from the capture itself, so replaying the same
    /// file yields the same summary.
    pub generated_at: String,
    pub counters: ProtocolCounters,
    /// Frames skipped because their link layer is not Ethernet.
    pub skipped_non_ethernet: u64,
    /// RFC3339 timestamp of the first frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Drain `source`, writing one report per frame to `log` and invoking
/// `on_frame` with the counters after every dissected frame.
///
/// Frame-level decode failures are reported as a one-line diagnostic and do
/// not stop the session; only source and sink failures do.
pub fn run_session<S, W, F>(
    mut source: S,
    log: &mut W,
    mut on_frame: F,
) -> Result<SessionSummary, SessionError>
where
    S: PacketSource,
    W: Write,
    F: FnMut(&ProtocolCounters),
{
    let mut counters = ProtocolCounters::default();
    let mut skipped_non_ethernet = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;

    while let Some(event) = source.next_frame()? {
        update_ts_bounds(&mut first_ts, &mut last_ts, event.ts);
        if event.link != LinkKind::Ethernet {
            skipped_non_ethernet += 1;
            debug!(len = event.data.len(), "skipping non-Ethernet frame");
            continue;
        }

        match dissect(&event.data) {
            Ok(dissection) => {
                counters.record(dissection.transport.class());
                write_report(log, &dissection)?;
            }
            Err(err) => {
                counters.record_malformed();
                warn!(%err, len = event.data.len(), "frame failed to decode");
                write_malformed(log, event.data.len(), &err)?;
            }
        }
        on_frame(&counters);
    }
    log.flush()?;

    let time_start = ts_to_rfc3339(first_ts);
    let time_end = ts_to_rfc3339(last_ts);
    let generated_at = time_end
        .clone()
        .or_else(|| time_start.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());

    Ok(SessionSummary {
        generated_at,
        counters,
        skipped_non_ethernet,
        time_start,
        time_end,
    })
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
