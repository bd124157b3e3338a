//! Error types for jpeg-draw

use std::io;

/// Result type for jpeg-draw operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening a source or preparing a decode
///
/// Failures that happen before the decode engine runs (unreadable file,
/// truncated prefetch) surface here. A decode that ran but did not
/// complete is not an `Error` - it travels back to the caller as a
/// [`DecodeStatus`](crate::DecodeStatus) value.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The image header could not be understood by the decode engine
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A buffered-stream open could not fill the requested prefetch buffer
    #[error("Truncated prefetch: got {got} of {wanted} bytes")]
    TruncatedPrefetch { wanted: usize, got: usize },

    /// A stream seek targeted a position behind the current one
    #[error("Backward seek on stream: {from} -> {to}")]
    BackwardSeek { from: u64, to: u64 },
}
