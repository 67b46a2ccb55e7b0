//! Fuzz target for CBOR-decoding a `Command` off the control channel.
//!
//! Covers type confusion between opcode variants, truncated maps, and
//! oversized nested structures; `ciborium` must reject these, never panic.

#![no_main]

use aris_proto::{Command, payloads};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = payloads::decode::<Command>(data);
});
