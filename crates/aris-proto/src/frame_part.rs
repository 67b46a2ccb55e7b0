//! `FramePart`: one UDP-sized fragment of a frame.
//!
//! Hand-rolled binary layout (not CBOR) because the first fragment of a
//! frame carries an opaque, already-allocated header blob that must survive
//! the wire bit-exact; CBOR-wrapping an opaque byte blob on the hottest
//! message type in the system would be pure overhead. All integer fields
//! are big-endian, matching the rest of this crate's length-prefixed wire
//! conventions.
//!
//! Wire layout:
//!
//! ```text
//! [frame_index: i32 BE]
//! [data_offset: i32 BE]
//! [flags: u8]               bit 0 = has_header
//! if has_header:
//!     [total_data_size: i32 BE]
//!     [header_len: u32 BE]
//!     [header bytes]
//! [data_len: u32 BE]
//! [data bytes]
//! ```

use bytes::{Buf, BufMut, Bytes};

use crate::errors::{Result, WireError};

const HAS_HEADER_FLAG: u8 = 0x01;

/// One fragment of a frame as received from (or sent to) the frame-stream
/// socket.
///
/// Only the first fragment of a frame (`data_offset == 0`) carries `header`
/// and `total_data_size`; later fragments leave both `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePart {
    /// Index of the frame this fragment belongs to.
    pub frame_index: i32,
    /// Byte offset of `data` within the frame's overall sample buffer.
    pub data_offset: i32,
    /// Present only on the first fragment: the frame header blob.
    pub header: Option<Bytes>,
    /// This fragment's payload bytes.
    pub data: Bytes,
    /// Present only on the first fragment: the frame's total byte size.
    pub total_data_size: Option<i32>,
}

impl FramePart {
    /// Encode this fragment onto the wire.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Malformed`] if exactly one of `header`/
    /// `total_data_size` is set (both or neither is required).
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        dst.put_i32(self.frame_index);
        dst.put_i32(self.data_offset);

        match (&self.header, self.total_data_size) {
            (Some(header), Some(total_data_size)) => {
                dst.put_u8(HAS_HEADER_FLAG);
                dst.put_i32(total_data_size);
                #[allow(clippy::cast_possible_truncation)]
                dst.put_u32(header.len() as u32);
                dst.put_slice(header);
            },
            (None, None) => {
                dst.put_u8(0);
            },
            _ => {
                return Err(WireError::Malformed {
                    reason: "header and total_data_size must both be present or both absent"
                        .to_string(),
                });
            },
        }

        #[allow(clippy::cast_possible_truncation)]
        dst.put_u32(self.data.len() as u32);
        dst.put_slice(&self.data);

        Ok(())
    }

    /// Decode a fragment from a datagram's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] if the buffer is shorter than a
    /// field it claims, or [`WireError::Malformed`] on any structural
    /// violation.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut buf = bytes;

        let frame_index = read_i32(&mut buf)?;
        let data_offset = read_i32(&mut buf)?;
        let flags = read_u8(&mut buf)?;

        let (header, total_data_size) = if flags & HAS_HEADER_FLAG != 0 {
            let total = read_i32(&mut buf)?;
            let header_len = read_u32(&mut buf)? as usize;
            if buf.remaining() < header_len {
                return Err(WireError::Truncated { expected: header_len, actual: buf.remaining() });
            }
            let header = Bytes::copy_from_slice(&buf[..header_len]);
            buf.advance(header_len);
            (Some(header), Some(total))
        } else {
            (None, None)
        };

        let data_len = read_u32(&mut buf)? as usize;
        if buf.remaining() < data_len {
            return Err(WireError::Truncated { expected: data_len, actual: buf.remaining() });
        }
        let data = Bytes::copy_from_slice(&buf[..data_len]);

        Ok(Self { frame_index, data_offset, header, data, total_data_size })
    }
}

fn read_i32(buf: &mut &[u8]) -> Result<i32> {
    if buf.remaining() < 4 {
        return Err(WireError::Truncated { expected: 4, actual: buf.remaining() });
    }
    Ok(buf.get_i32())
}

fn read_u32(buf: &mut &[u8]) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(WireError::Truncated { expected: 4, actual: buf.remaining() });
    }
    Ok(buf.get_u32())
}

fn read_u8(buf: &mut &[u8]) -> Result<u8> {
    if buf.remaining() < 1 {
        return Err(WireError::Truncated { expected: 1, actual: buf.remaining() });
    }
    Ok(buf.get_u8())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn arb_part() -> impl Strategy<Value = FramePart> {
        (any::<i32>(), any::<Vec<u8>>(), proptest::option::of(any::<(Vec<u8>, i32)>())).prop_map(
            |(frame_index, data, header)| {
                let (header, total_data_size) = match header {
                    Some((h, t)) => (Some(Bytes::from(h)), Some(t)),
                    None => (None, None),
                };
                FramePart {
                    frame_index,
                    data_offset: 0,
                    header,
                    data: Bytes::from(data),
                    total_data_size,
                }
            },
        )
    }

    proptest! {
        #[test]
        fn frame_part_round_trip(part in arb_part()) {
            let mut wire = Vec::new();
            part.encode(&mut wire).expect("should encode");
            let decoded = FramePart::decode(&wire).expect("should decode");
            prop_assert_eq!(part, decoded);
        }
    }

    #[test]
    fn first_fragment_round_trip() {
        let part = FramePart {
            frame_index: 0,
            data_offset: 0,
            header: Some(Bytes::from_static(b"hdr")),
            data: Bytes::from_static(b"payload"),
            total_data_size: Some(1800),
        };
        let mut wire = Vec::new();
        part.encode(&mut wire).expect("should encode");
        let decoded = FramePart::decode(&wire).expect("should decode");
        assert_eq!(part, decoded);
    }

    #[test]
    fn later_fragment_has_no_header() {
        let part = FramePart {
            frame_index: 0,
            data_offset: 600,
            header: None,
            data: Bytes::from_static(b"more payload"),
            total_data_size: None,
        };
        let mut wire = Vec::new();
        part.encode(&mut wire).expect("should encode");
        let decoded = FramePart::decode(&wire).expect("should decode");
        assert!(decoded.header.is_none());
        assert!(decoded.total_data_size.is_none());
    }

    #[test]
    fn reject_truncated_header() {
        let part = FramePart {
            frame_index: 0,
            data_offset: 0,
            header: Some(Bytes::from_static(b"header-bytes")),
            data: Bytes::new(),
            total_data_size: Some(100),
        };
        let mut wire = Vec::new();
        part.encode(&mut wire).expect("should encode");
        wire.truncate(wire.len() - 4);
        assert!(matches!(FramePart::decode(&wire), Err(WireError::Truncated { .. })));
    }
}
