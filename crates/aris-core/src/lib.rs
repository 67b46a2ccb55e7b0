//! Protocol-level logic for ARIS sonar integration: acoustic math, frame
//! assembly, sample reordering, recording, and the time/randomness
//! abstraction that lets all of it run deterministically under simulation.
//!
//! This crate has no networking code; `aris-client` drives these state
//! machines against real sockets.

pub mod acoustics;
pub mod assembler;
pub mod env;
pub mod error;
pub mod frame_builder;
pub mod metrics;
pub mod ping_mode;
pub mod recording;
pub mod reorder;

pub use acoustics::{FrameRateInputs, SalinityBand, conversion_factor, depth_m, max_frame_rate, speed_of_sound};
pub use assembler::{Assembler, AssemblerAction, Frame};
pub use env::{Environment, SystemEnvironment};
pub use error::{AssemblerError, RecordingError};
pub use frame_builder::{FrameBuilder, FrameBuilderError};
pub use metrics::Metrics;
pub use ping_mode::PingMode;
pub use recording::RecordingWriter;
pub use reorder::reorder;
