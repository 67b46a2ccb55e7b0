//! CBOR-encoded protocol messages.
//!
//! `FramePart` is raw binary for performance (see [`crate::FramePart`]), but
//! the beacon, command, and ack payloads use CBOR for type safety and
//! forward compatibility, the same split the teacher repo makes between its
//! raw-binary frame header and its CBOR-encoded `Payload` enum.

pub mod ack;
pub mod availability;
pub mod command;

use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{Result, WireError};

/// Encode a CBOR payload into a byte vector.
///
/// # Errors
///
/// Returns [`WireError::CborEncode`] on serialization failure.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| WireError::CborEncode(e.to_string()))?;
    Ok(buf)
}

/// Decode a CBOR payload from bytes.
///
/// # Errors
///
/// Returns [`WireError::CborDecode`] on deserialization failure.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::de::from_reader(bytes).map_err(|e| WireError::CborDecode(e.to_string()))
}
