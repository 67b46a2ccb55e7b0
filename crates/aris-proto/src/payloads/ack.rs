//! `FramePartAck` payload.

use serde::{Deserialize, Serialize};

/// Acknowledgement sent back to the fragment's source address after each
/// processed `FramePart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePartAck {
    /// Frame index the ack refers to.
    pub frame_index: i32,
    /// The assembler's next-expected data offset for that frame.
    pub data_offset: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_cbor_round_trip() {
        let ack = FramePartAck { frame_index: 0, data_offset: 1200 };
        let bytes = crate::payloads::encode(&ack).expect("should encode");
        let decoded: FramePartAck = crate::payloads::decode(&bytes).expect("should decode");
        assert_eq!(ack, decoded);
    }
}
