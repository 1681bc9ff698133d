use thiserror::Error;

/// Errors raised while decoding headers out of a captured frame.
///
/// Both variants abort dissection of the current frame only; the capture
/// loop keeps running and counts the frame as malformed.
#[derive(Debug, Error)]
pub enum DissectError {
    #[error("frame too short: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("{header} header length {len} below minimum {min} bytes")]
    InvalidHeaderLength {
        header: &'static str,
        len: usize,
        min: usize,
    },
}
