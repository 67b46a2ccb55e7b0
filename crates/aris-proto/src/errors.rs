//! Error types for wire and file-format codecs.

use thiserror::Error;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors that can occur while encoding or decoding wire/file records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Generic decode failure: magic, version, or structural check failed.
    #[error("malformed wire packet: {reason}")]
    Malformed {
        /// What failed.
        reason: String,
    },

    /// Payload (or sample buffer) exceeds the protocol's size limit.
    #[error("payload too large: {size} bytes, max {max}")]
    PayloadTooLarge {
        /// Size observed.
        size: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Buffer is shorter than the size a header/prefix claims.
    #[error("frame truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes the record claimed.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// CBOR encode failure (`Availability`/`Command`/`FramePartAck`).
    #[error("cbor encode error: {0}")]
    CborEncode(String),

    /// CBOR decode failure.
    #[error("cbor decode error: {0}")]
    CborDecode(String),
}
