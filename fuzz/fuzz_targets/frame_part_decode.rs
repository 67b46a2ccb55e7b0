//! Fuzz target for `FramePart::decode`.
//!
//! Exercises the hand-rolled binary fragment codec with arbitrary bytes.
//! Decoding must never panic; malformed input returns `Err`.

#![no_main]

use aris_proto::FramePart;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = FramePart::decode(data);
});
