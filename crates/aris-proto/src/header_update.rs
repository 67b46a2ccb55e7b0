//! Header-update telemetry overlay (UDP port 700).
//!
//! Fixed-layout, 1-byte-packed, **native-endian** structure. This matches
//! device expectations only on little-endian hosts; see the open question
//! recorded for this component — no cross-endian (field-wise) variant is
//! implemented here, since the behavior for non-little-endian senders was
//! left an open question rather than a requirement.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Command code for a header-update datagram.
pub const COMMAND: u16 = 0xA502;
/// Packet type for a header-update datagram.
pub const PKT_TYPE: u16 = 0x0040;

/// Bit flags selecting which fields of [`HeaderUpdateBody`] the sonar
/// should overlay into subsequent frame headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum UpdateFlag {
    /// Vehicle velocity.
    Velocity = 0x0000_0001,
    /// Depth.
    Depth = 0x0000_0002,
    /// Altitude above bottom.
    Altitude = 0x0000_0004,
    /// Pitch angle.
    Pitch = 0x0000_0008,
    /// Pitch rate.
    PitchRate = 0x0000_0010,
    /// Roll angle.
    Roll = 0x0000_0020,
    /// Roll rate.
    RollRate = 0x0000_0040,
    /// Heading.
    Heading = 0x0000_0080,
    /// Heading rate.
    HeadingRate = 0x0000_0100,
    /// Sonar mount pan angle.
    SonarPan = 0x0000_0200,
    /// Sonar mount tilt angle.
    SonarTilt = 0x0000_0400,
    /// Sonar mount roll angle.
    SonarRoll = 0x0000_0800,
    /// Latitude.
    Latitude = 0x0000_1000,
    /// Longitude.
    Longitude = 0x0000_2000,
    /// Sonar position (x, y, z).
    SonarPosition = 0x0000_4000,
    /// Target range.
    TargetRange = 0x0000_8000,
    /// Target bearing.
    TargetBearing = 0x0001_0000,
    /// Target-present flag.
    TargetPresent = 0x0002_0000,
    /// Opaque user data blob.
    UserData = 0x0004_0000,
    /// Sonar-reported time.
    SonarTime = 0x0008_0000,
    /// Secondary temperature reading.
    DegC2 = 0x0010_0000,
    /// Frame number.
    FrameNumber = 0x0020_0000,
    /// Water temperature.
    WaterTemp = 0x0040_0000,
    /// Sonar x position.
    SonarX = 0x0080_0000,
    /// Sonar y position.
    SonarY = 0x0100_0000,
    /// Sonar z position.
    SonarZ = 0x0200_0000,
    /// Vehicle-reported time.
    VehicleTime = 0x0400_0000,
    /// Raw GGK GPS sentence.
    Ggk = 0x0800_0000,
    /// Pan mount offset.
    PanOffset = 0x1000_0000,
    /// Tilt mount offset.
    TiltOffset = 0x2000_0000,
    /// Roll mount offset.
    RollOffset = 0x4000_0000,
}

/// 8-byte, 4×u16 prefix common to every header-update datagram.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct HeaderUpdatePrefix {
    n_command: [u8; 2],
    n_size: [u8; 2],
    n_pkt_type: [u8; 2],
    n_pkt_num: [u8; 2],
}

impl HeaderUpdatePrefix {
    /// Size of the prefix in bytes.
    pub const SIZE: usize = 8;

    /// Build a prefix for a body of the given size and packet sequence
    /// number.
    #[must_use]
    pub fn new(body_size: u16, pkt_num: u16) -> Self {
        Self {
            n_command: COMMAND.to_ne_bytes(),
            n_size: body_size.to_ne_bytes(),
            n_pkt_type: PKT_TYPE.to_ne_bytes(),
            n_pkt_num: pkt_num.to_ne_bytes(),
        }
    }

    /// Command code.
    #[must_use]
    pub fn n_command(&self) -> u16 {
        u16::from_ne_bytes(self.n_command)
    }

    /// Declared body size.
    #[must_use]
    pub fn n_size(&self) -> u16 {
        u16::from_ne_bytes(self.n_size)
    }

    /// Packet type.
    #[must_use]
    pub fn n_pkt_type(&self) -> u16 {
        u16::from_ne_bytes(self.n_pkt_type)
    }

    /// Packet sequence number (starts at 1).
    #[must_use]
    pub fn n_pkt_num(&self) -> u16 {
        u16::from_ne_bytes(self.n_pkt_num)
    }
}

/// Telemetry body of a header-update datagram: 31 typed fields plus the
/// 32-bit field-selection mask.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct HeaderUpdateBody {
    velocity: [u8; 4],
    depth: [u8; 4],
    altitude: [u8; 4],
    pitch: [u8; 4],
    pitch_rate: [u8; 4],
    roll: [u8; 4],
    roll_rate: [u8; 4],
    heading: [u8; 4],
    heading_rate: [u8; 4],
    sonar_pan: [u8; 4],
    sonar_tilt: [u8; 4],
    sonar_roll: [u8; 4],
    latitude: [u8; 8],
    longitude: [u8; 8],
    sonar_position: [u8; 12],
    target_range: [u8; 4],
    target_bearing: [u8; 4],
    target_present: [u8; 4],
    user_data: [u8; 32],
    sonar_time: [u8; 8],
    deg_c2: [u8; 4],
    frame_number: [u8; 4],
    water_temp: [u8; 4],
    sonar_x: [u8; 4],
    sonar_y: [u8; 4],
    sonar_z: [u8; 4],
    vehicle_time: [u8; 8],
    ggk: [u8; 32],
    pan_offset: [u8; 4],
    tilt_offset: [u8; 4],
    roll_offset: [u8; 4],
    update_flags: [u8; 4],
}

impl HeaderUpdateBody {
    /// Size of the body in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// A zeroed body with no fields selected.
    #[must_use]
    pub fn zeroed() -> Self {
        #[allow(clippy::expect_used)]
        Self::read_from_bytes(&[0u8; Self::SIZE]).expect("zero buffer matches layout")
    }

    /// Currently-selected field mask.
    #[must_use]
    pub fn update_flags(&self) -> u32 {
        u32::from_ne_bytes(self.update_flags)
    }

    /// Select (OR in) the given flags.
    pub fn set_flag(&mut self, flag: UpdateFlag) {
        let current = self.update_flags();
        self.update_flags = (current | flag as u32).to_ne_bytes();
    }

    /// Whether `flag` is currently selected.
    #[must_use]
    pub fn has_flag(&self, flag: UpdateFlag) -> bool {
        self.update_flags() & flag as u32 != 0
    }

    /// Set the depth field and select [`UpdateFlag::Depth`].
    pub fn set_depth(&mut self, value: f32) {
        self.depth = value.to_ne_bytes();
        self.set_flag(UpdateFlag::Depth);
    }

    /// Read the depth field.
    #[must_use]
    pub fn depth(&self) -> f32 {
        f32::from_ne_bytes(self.depth)
    }

    /// Set the water-temperature field and select
    /// [`UpdateFlag::WaterTemp`].
    pub fn set_water_temp(&mut self, value: f32) {
        self.water_temp = value.to_ne_bytes();
        self.set_flag(UpdateFlag::WaterTemp);
    }

    /// Read the water-temperature field.
    #[must_use]
    pub fn water_temp(&self) -> f32 {
        f32::from_ne_bytes(self.water_temp)
    }

    /// Set the heading field and select [`UpdateFlag::Heading`].
    pub fn set_heading(&mut self, value: f32) {
        self.heading = value.to_ne_bytes();
        self.set_flag(UpdateFlag::Heading);
    }

    /// Read the heading field.
    #[must_use]
    pub fn heading(&self) -> f32 {
        f32::from_ne_bytes(self.heading)
    }
}

impl Default for HeaderUpdateBody {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl std::fmt::Debug for HeaderUpdateBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderUpdateBody")
            .field("update_flags", &format_args!("{:#010x}", self.update_flags()))
            .field("depth", &self.depth())
            .field("water_temp", &self.water_temp())
            .field("heading", &self.heading())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_round_trips() {
        #[allow(clippy::cast_possible_truncation)]
        let prefix = HeaderUpdatePrefix::new(HeaderUpdateBody::SIZE as u16, 1);
        assert_eq!(prefix.n_command(), COMMAND);
        assert_eq!(prefix.n_pkt_type(), PKT_TYPE);
        assert_eq!(prefix.n_pkt_num(), 1);
    }

    #[test]
    fn body_flags_and_fields() {
        let mut body = HeaderUpdateBody::zeroed();
        assert_eq!(body.update_flags(), 0);

        body.set_depth(3.728);
        body.set_water_temp(15.0);

        assert!(body.has_flag(UpdateFlag::Depth));
        assert!(body.has_flag(UpdateFlag::WaterTemp));
        assert!(!body.has_flag(UpdateFlag::Heading));
        assert!((body.depth() - 3.728).abs() < 1e-6);
        assert!((body.water_temp() - 15.0).abs() < 1e-6);
    }

    #[test]
    fn body_size_accounts_for_all_31_fields() {
        // 31 selectable fields via bit flags 0x1 .. 0x4000_0000 inclusive,
        // plus the mask itself.
        assert!(HeaderUpdateBody::SIZE > 31 * 4);
    }
}
