//! Beacon `Availability` payload.

use serde::{Deserialize, Serialize};

/// System type tag carried in beacons, frame headers, and settings records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemType {
    /// ARIS 1800.
    Aris1800,
    /// ARIS 3000.
    Aris3000,
    /// ARIS 1200.
    Aris1200,
}

impl SystemType {
    /// Decode from the numeric system-type tag on the wire.
    #[must_use]
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1800 => Some(Self::Aris1800),
            3000 => Some(Self::Aris3000),
            1200 => Some(Self::Aris1200),
            _ => None,
        }
    }

    /// Numeric system-type tag for the wire.
    #[must_use]
    pub fn to_u32(self) -> u32 {
        match self {
            Self::Aris1800 => 1800,
            Self::Aris3000 => 3000,
            Self::Aris1200 => 1200,
        }
    }
}

/// Beacon payload broadcast/multicast on port 56124.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Device serial number.
    pub serial_number: u32,
    /// Hardware variant.
    pub system_type: SystemType,
    /// Whether another client already holds the command session.
    pub connection_state: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_type_round_trips_through_wire_value() {
        for (raw, expected) in
            [(1800, SystemType::Aris1800), (3000, SystemType::Aris3000), (1200, SystemType::Aris1200)]
        {
            let parsed = SystemType::from_u32(raw).expect("known value");
            assert_eq!(parsed, expected);
            assert_eq!(parsed.to_u32(), raw);
        }
        assert!(SystemType::from_u32(9999).is_none());
    }

    #[test]
    fn availability_cbor_round_trip() {
        let availability = Availability {
            serial_number: 123_456,
            system_type: SystemType::Aris3000,
            connection_state: false,
        };
        let bytes = crate::payloads::encode(&availability).expect("should encode");
        let decoded: Availability = crate::payloads::decode(&bytes).expect("should decode");
        assert_eq!(availability, decoded);
    }
}
