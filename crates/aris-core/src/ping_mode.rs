//! Ping mode: pings-per-frame and beams-per-frame lookup.

/// Recognized ping modes. Any other raw value is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PingMode {
    /// 3 pings per frame, 48 beams.
    Mode1,
    /// 6 pings per frame, 96 beams.
    Mode3,
    /// 4 pings per frame, 64 beams.
    Mode6,
    /// 8 pings per frame, 128 beams.
    Mode9,
}

impl PingMode {
    /// Decode from the raw wire value (1, 3, 6, or 9).
    #[must_use]
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Mode1),
            3 => Some(Self::Mode3),
            6 => Some(Self::Mode6),
            9 => Some(Self::Mode9),
            _ => None,
        }
    }

    /// Raw wire value for this mode.
    #[must_use]
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Mode1 => 1,
            Self::Mode3 => 3,
            Self::Mode6 => 6,
            Self::Mode9 => 9,
        }
    }

    /// Number of pings fired per frame.
    #[must_use]
    pub fn pings_per_frame(self) -> u32 {
        match self {
            Self::Mode1 => 3,
            Self::Mode3 => 6,
            Self::Mode6 => 4,
            Self::Mode9 => 8,
        }
    }

    /// Number of beams per frame.
    #[must_use]
    pub fn beams(self) -> u32 {
        match self {
            Self::Mode1 => 48,
            Self::Mode3 => 96,
            Self::Mode6 => 64,
            Self::Mode9 => 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_modes_map_to_documented_shape() {
        let cases = [
            (PingMode::Mode1, 3, 48),
            (PingMode::Mode3, 6, 96),
            (PingMode::Mode6, 4, 64),
            (PingMode::Mode9, 8, 128),
        ];
        for (mode, expected_ppf, expected_beams) in cases {
            assert_eq!(mode.pings_per_frame(), expected_ppf);
            assert_eq!(mode.beams(), expected_beams);
        }
    }

    #[test]
    fn raw_values_round_trip() {
        for raw in [1, 3, 6, 9] {
            let mode = PingMode::from_raw(raw).expect("known raw value");
            assert_eq!(mode.to_raw(), raw);
        }
    }

    #[test]
    fn unknown_raw_value_is_invalid() {
        assert!(PingMode::from_raw(0).is_none());
        assert!(PingMode::from_raw(2).is_none());
        assert!(PingMode::from_raw(10).is_none());
    }
}
