//! Property-based tests for wire codec round-trips.
//!
//! These tests verify that encoding/decoding is correct for all valid
//! inputs, not just specific examples.

use aris_proto::{ArisFileHeader, ArisFrameHeader};
use proptest::prelude::*;

fn arbitrary_frame_header() -> impl Strategy<Value = ArisFrameHeader> {
    (any::<i32>(), any::<u32>(), any::<u32>(), any::<u32>(), any::<u32>()).prop_map(
        |(frame_index, cookie, serial, ping_mode, samples_per_beam)| {
            let mut header = ArisFrameHeader::zeroed();
            header.set_frame_index(frame_index);
            header.set_cookie(cookie);
            header.set_sonar_serial_number(serial);
            header.set_ping_mode(ping_mode);
            header.set_samples_per_beam(samples_per_beam);
            header
        },
    )
}

proptest! {
    #[test]
    fn prop_frame_header_round_trip(header in arbitrary_frame_header()) {
        let bytes = header.to_bytes();
        let decoded = ArisFrameHeader::from_bytes(&bytes).expect("should parse");
        prop_assert_eq!(decoded, header);
    }

    #[test]
    fn prop_file_header_round_trip(
        frame_count in any::<u32>(),
        samples_per_channel in any::<u32>(),
        num_raw_beams in any::<u32>(),
        sn in any::<u32>(),
    ) {
        let mut header = ArisFileHeader::new();
        header.set_frame_count(frame_count);
        header.set_samples_per_channel(samples_per_channel);
        header.set_num_raw_beams(num_raw_beams);
        header.set_sn(sn);

        let bytes = header.to_bytes();
        let decoded = ArisFileHeader::from_bytes(&bytes).expect("should parse");
        prop_assert_eq!(decoded, header);
    }
}
