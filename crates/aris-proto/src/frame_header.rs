//! Fixed-layout frame header.
//!
//! A frame header is always exactly [`ArisFrameHeader::SIZE`] bytes once it
//! reaches [`crate::Frame`]. On the wire, the device only ever sends a
//! prefix of that many bytes with the first fragment of a frame; the
//! remainder is zero-extended by the caller (the frame builder in
//! `aris-core`) before the header is parsed here. All typed fields are
//! little-endian, matching the device's native byte order.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::{Result, WireError};

/// Fixed-layout frame header record.
///
/// Layout on the wire: typed telemetry fields first, then reserved padding
/// out to [`ArisFrameHeader::SIZE`] bytes. `#[repr(C, packed)]` plus raw byte
/// array fields avoid unaligned-reference UB; typed values are read and
/// written through accessor methods.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ArisFrameHeader {
    frame_index: [u8; 4],
    cookie: [u8; 4],
    sonar_serial_number: [u8; 4],
    system_type: [u8; 4],
    ping_mode: [u8; 4],
    samples_per_beam: [u8; 4],
    sample_period_us: [u8; 4],
    sample_start_delay_us: [u8; 4],
    cycle_period_us: [u8; 4],
    pulse_width_us: [u8; 4],
    frame_rate: [u8; 4],
    reordered_samples: [u8; 4],
    water_temp_c: [u8; 4],
    depth_m: [u8; 4],
    velocity: [u8; 4],
    altitude: [u8; 4],
    pitch: [u8; 4],
    roll: [u8; 4],
    heading: [u8; 4],
    latitude: [u8; 8],
    longitude: [u8; 8],
    update_flags: [u8; 4],
    reserved: [u8; ArisFrameHeader::RESERVED_LEN],
}

impl ArisFrameHeader {
    /// Total on-wire/on-disk size of a frame header.
    pub const SIZE: usize = 1024;
    /// Number of typed fields before the reserved padding.
    const FIXED_LEN: usize = 96;
    const RESERVED_LEN: usize = Self::SIZE - Self::FIXED_LEN;

    /// Byte offset of `frame_index`, used by the recording writer for
    /// back-patching after a frame has been written.
    pub const FRAME_INDEX_OFFSET: usize = 0;

    /// A zeroed header with `frame_index = -1` and every other field zero.
    #[must_use]
    pub fn zeroed() -> Self {
        let mut header = Self {
            frame_index: [0; 4],
            cookie: [0; 4],
            sonar_serial_number: [0; 4],
            system_type: [0; 4],
            ping_mode: [0; 4],
            samples_per_beam: [0; 4],
            sample_period_us: [0; 4],
            sample_start_delay_us: [0; 4],
            cycle_period_us: [0; 4],
            pulse_width_us: [0; 4],
            frame_rate: [0; 4],
            reordered_samples: [0; 4],
            water_temp_c: [0; 4],
            depth_m: [0; 4],
            velocity: [0; 4],
            altitude: [0; 4],
            pitch: [0; 4],
            roll: [0; 4],
            heading: [0; 4],
            latitude: [0; 8],
            longitude: [0; 8],
            update_flags: [0; 4],
            reserved: [0; Self::RESERVED_LEN],
        };
        header.set_frame_index(-1);
        header
    }

    /// Parse a frame header from exactly [`ArisFrameHeader::SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] if fewer bytes are supplied.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(WireError::Truncated { expected: Self::SIZE, actual: bytes.len() });
        }
        Self::read_from_bytes(&bytes[..Self::SIZE])
            .map_err(|_| WireError::Malformed { reason: "frame header size mismatch".to_string() })
    }

    /// Zero-extend a wire-received header prefix (as short as the device
    /// chooses to send) up to the fixed [`ArisFrameHeader::SIZE`].
    #[must_use]
    pub fn from_wire_prefix(prefix: &[u8]) -> Self {
        let mut buf = [0u8; Self::SIZE];
        let n = prefix.len().min(Self::SIZE);
        buf[..n].copy_from_slice(&prefix[..n]);
        #[allow(clippy::expect_used)]
        Self::read_from_bytes(&buf).expect("buffer is exactly SIZE bytes")
    }

    /// Raw byte view suitable for writing to the wire or disk.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        #[allow(clippy::expect_used)]
        self.as_bytes().try_into().expect("ArisFrameHeader is exactly SIZE bytes")
    }

    /// Zero-based frame index assigned by the device (or the recording
    /// writer, after back-patching).
    #[must_use]
    pub fn frame_index(&self) -> i32 {
        i32::from_le_bytes(self.frame_index)
    }

    /// Overwrite `frame_index`, used by the recording writer's back-patch.
    pub fn set_frame_index(&mut self, value: i32) {
        self.frame_index = value.to_le_bytes();
    }

    /// Settings cookie this frame was produced under.
    #[must_use]
    pub fn cookie(&self) -> u32 {
        u32::from_le_bytes(self.cookie)
    }

    /// Set the settings cookie.
    pub fn set_cookie(&mut self, value: u32) {
        self.cookie = value.to_le_bytes();
    }

    /// Device serial number.
    #[must_use]
    pub fn sonar_serial_number(&self) -> u32 {
        u32::from_le_bytes(self.sonar_serial_number)
    }

    /// Set the device serial number.
    pub fn set_sonar_serial_number(&mut self, value: u32) {
        self.sonar_serial_number = value.to_le_bytes();
    }

    /// System type tag (1800/3000/1200).
    #[must_use]
    pub fn system_type(&self) -> u32 {
        u32::from_le_bytes(self.system_type)
    }

    /// Set the system type tag.
    pub fn set_system_type(&mut self, value: u32) {
        self.system_type = value.to_le_bytes();
    }

    /// Raw ping mode value (1/3/6/9).
    #[must_use]
    pub fn ping_mode(&self) -> u32 {
        u32::from_le_bytes(self.ping_mode)
    }

    /// Set the raw ping mode value.
    pub fn set_ping_mode(&mut self, value: u32) {
        self.ping_mode = value.to_le_bytes();
    }

    /// Samples captured per beam.
    #[must_use]
    pub fn samples_per_beam(&self) -> u32 {
        u32::from_le_bytes(self.samples_per_beam)
    }

    /// Set samples captured per beam.
    pub fn set_samples_per_beam(&mut self, value: u32) {
        self.samples_per_beam = value.to_le_bytes();
    }

    /// `1` once [`crate::reorder`]-equivalent logic in `aris-core` has
    /// reordered the sample buffer; `0` otherwise.
    #[must_use]
    pub fn reordered_samples(&self) -> u32 {
        u32::from_le_bytes(self.reordered_samples)
    }

    /// Set the reordered-samples flag.
    pub fn set_reordered_samples(&mut self, value: u32) {
        self.reordered_samples = value.to_le_bytes();
    }

    /// Water temperature in Celsius, as overlaid by a header-update message
    /// or reported natively by the device.
    #[must_use]
    pub fn water_temp_c(&self) -> f32 {
        f32::from_le_bytes(self.water_temp_c)
    }

    /// Set water temperature.
    pub fn set_water_temp_c(&mut self, value: f32) {
        self.water_temp_c = value.to_le_bytes();
    }

    /// Depth in meters, as overlaid by a header-update message.
    #[must_use]
    pub fn depth_m(&self) -> f32 {
        f32::from_le_bytes(self.depth_m)
    }

    /// Set depth in meters.
    pub fn set_depth_m(&mut self, value: f32) {
        self.depth_m = value.to_le_bytes();
    }
}

// `#[repr(C, packed)]` forbids a derived `Debug`/`PartialEq` (fields would
// need unaligned references); implement both manually against decoded
// values instead.
impl std::fmt::Debug for ArisFrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArisFrameHeader")
            .field("frame_index", &self.frame_index())
            .field("cookie", &self.cookie())
            .field("sonar_serial_number", &self.sonar_serial_number())
            .field("system_type", &self.system_type())
            .field("ping_mode", &self.ping_mode())
            .field("samples_per_beam", &self.samples_per_beam())
            .field("reordered_samples", &self.reordered_samples())
            .finish_non_exhaustive()
    }
}

impl PartialEq for ArisFrameHeader {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ArisFrameHeader {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_round_trips() {
        let header = ArisFrameHeader::zeroed();
        let bytes = header.to_bytes();
        let parsed = ArisFrameHeader::from_bytes(&bytes).expect("should parse");
        assert_eq!(header, parsed);
        assert_eq!(parsed.frame_index(), -1);
    }

    #[test]
    fn wire_prefix_zero_extends() {
        let mut prefix = vec![0u8; 16];
        prefix[0..4].copy_from_slice(&42i32.to_le_bytes());
        let header = ArisFrameHeader::from_wire_prefix(&prefix);
        assert_eq!(header.frame_index(), 42);
        assert_eq!(header.to_bytes().len(), ArisFrameHeader::SIZE);
    }

    #[test]
    fn reject_short_buffer() {
        let short = vec![0u8; ArisFrameHeader::SIZE - 1];
        assert!(matches!(
            ArisFrameHeader::from_bytes(&short),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn setters_round_trip() {
        let mut header = ArisFrameHeader::zeroed();
        header.set_frame_index(7);
        header.set_cookie(3);
        header.set_sonar_serial_number(123_456);
        header.set_ping_mode(9);
        header.set_samples_per_beam(1750);
        header.set_reordered_samples(1);

        assert_eq!(header.frame_index(), 7);
        assert_eq!(header.cookie(), 3);
        assert_eq!(header.sonar_serial_number(), 123_456);
        assert_eq!(header.ping_mode(), 9);
        assert_eq!(header.samples_per_beam(), 1750);
        assert_eq!(header.reordered_samples(), 1);
    }
}
