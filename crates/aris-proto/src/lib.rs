//! Wire and file-format codecs for the ARIS sonar integration protocol.
//!
//! This crate has no networking or async code in it: it only encodes and
//! decodes bytes. `aris-core` and `aris-client` build the protocol and
//! networking logic on top of these types.

pub mod errors;
pub mod file_header;
pub mod frame_header;
pub mod frame_part;
pub mod header_update;
pub mod payloads;

pub use errors::{Result, WireError};
pub use file_header::{ARIS_FILE_SIGNATURE, ArisFileHeader};
pub use frame_header::ArisFrameHeader;
pub use frame_part::FramePart;
pub use header_update::{HeaderUpdateBody, HeaderUpdatePrefix, UpdateFlag};
pub use payloads::{
    ack::FramePartAck,
    availability::{Availability, SystemType},
    command::{AcousticSettings, Command, FocusDirection, Frequency, RotatorAxis, WaterType},
};
