//! Fixed-layout recording file header.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::{Result, WireError};

/// Magic value written into `Version` to identify a recording file.
pub const ARIS_FILE_SIGNATURE: u32 = 0x0587_1E2A;

/// Fixed-layout file header record, written once at the start of a
/// recording and back-patched as frames are appended.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ArisFileHeader {
    version: [u8; 4],
    frame_count: [u8; 4],
    samples_per_channel: [u8; 4],
    num_raw_beams: [u8; 4],
    sn: [u8; 4],
    reserved: [u8; ArisFileHeader::RESERVED_LEN],
}

impl ArisFileHeader {
    /// Total on-disk size of a file header.
    pub const SIZE: usize = 1024;
    const FIXED_LEN: usize = 20;
    const RESERVED_LEN: usize = Self::SIZE - Self::FIXED_LEN;

    /// A zero-initialized header carrying only the magic `Version` field.
    #[must_use]
    pub fn new() -> Self {
        let mut header = Self {
            version: [0; 4],
            frame_count: [0; 4],
            samples_per_channel: [0; 4],
            num_raw_beams: [0; 4],
            sn: [0; 4],
            reserved: [0; Self::RESERVED_LEN],
        };
        header.set_version(ARIS_FILE_SIGNATURE);
        header
    }

    /// Parse a file header from exactly [`ArisFileHeader::SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] if fewer bytes are supplied, or
    /// [`WireError::Malformed`] if the magic `Version` does not match
    /// [`ARIS_FILE_SIGNATURE`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(WireError::Truncated { expected: Self::SIZE, actual: bytes.len() });
        }
        #[allow(clippy::expect_used)]
        let header: Self = Self::read_from_bytes(&bytes[..Self::SIZE])
            .expect("slice is exactly SIZE bytes");
        if header.version() != ARIS_FILE_SIGNATURE {
            return Err(WireError::Malformed {
                reason: format!("bad file signature: {:#010x}", header.version()),
            });
        }
        Ok(header)
    }

    /// Raw byte view suitable for writing to disk.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        #[allow(clippy::expect_used)]
        self.as_bytes().try_into().expect("ArisFileHeader is exactly SIZE bytes")
    }

    /// Magic signature field.
    #[must_use]
    pub fn version(&self) -> u32 {
        u32::from_le_bytes(self.version)
    }

    fn set_version(&mut self, value: u32) {
        self.version = value.to_le_bytes();
    }

    /// Number of frames appended so far.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        u32::from_le_bytes(self.frame_count)
    }

    /// Overwrite the frame count.
    pub fn set_frame_count(&mut self, value: u32) {
        self.frame_count = value.to_le_bytes();
    }

    /// Samples captured per channel (beam), fixed by the first frame.
    #[must_use]
    pub fn samples_per_channel(&self) -> u32 {
        u32::from_le_bytes(self.samples_per_channel)
    }

    /// Set samples per channel.
    pub fn set_samples_per_channel(&mut self, value: u32) {
        self.samples_per_channel = value.to_le_bytes();
    }

    /// Number of raw beams, fixed by the first frame's ping mode.
    #[must_use]
    pub fn num_raw_beams(&self) -> u32 {
        u32::from_le_bytes(self.num_raw_beams)
    }

    /// Set the raw beam count.
    pub fn set_num_raw_beams(&mut self, value: u32) {
        self.num_raw_beams = value.to_le_bytes();
    }

    /// Sonar serial number, fixed by the first frame.
    #[must_use]
    pub fn sn(&self) -> u32 {
        u32::from_le_bytes(self.sn)
    }

    /// Set the sonar serial number.
    pub fn set_sn(&mut self, value: u32) {
        self.sn = value.to_le_bytes();
    }
}

impl Default for ArisFileHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ArisFileHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArisFileHeader")
            .field("version", &format_args!("{:#010x}", self.version()))
            .field("frame_count", &self.frame_count())
            .field("samples_per_channel", &self.samples_per_channel())
            .field("num_raw_beams", &self.num_raw_beams())
            .field("sn", &self.sn())
            .finish()
    }
}

impl PartialEq for ArisFileHeader {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ArisFileHeader {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_carries_signature() {
        let header = ArisFileHeader::new();
        assert_eq!(header.version(), ARIS_FILE_SIGNATURE);
        assert_eq!(header.frame_count(), 0);
    }

    #[test]
    fn round_trips_through_bytes() {
        let mut header = ArisFileHeader::new();
        header.set_frame_count(3);
        header.set_samples_per_channel(1750);
        header.set_num_raw_beams(128);
        header.set_sn(123_456);

        let bytes = header.to_bytes();
        let parsed = ArisFileHeader::from_bytes(&bytes).expect("should parse");
        assert_eq!(header, parsed);
    }

    #[test]
    fn rejects_bad_signature() {
        let bytes = [0u8; ArisFileHeader::SIZE];
        assert!(matches!(ArisFileHeader::from_bytes(&bytes), Err(WireError::Malformed { .. })));
    }

    #[test]
    fn rejects_short_buffer() {
        let bytes = vec![0u8; ArisFileHeader::SIZE - 1];
        assert!(matches!(ArisFileHeader::from_bytes(&bytes), Err(WireError::Truncated { .. })));
    }
}
