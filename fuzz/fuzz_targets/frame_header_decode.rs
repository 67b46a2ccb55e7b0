//! Fuzz target for `ArisFrameHeader::from_bytes`.
//!
//! The header is a `zerocopy`-parsed `#[repr(C, packed)]` struct; this
//! checks that arbitrary-length byte slices (short, long, misaligned) never
//! panic or read out of bounds.

#![no_main]

use aris_proto::ArisFrameHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = ArisFrameHeader::from_bytes(data);
});
