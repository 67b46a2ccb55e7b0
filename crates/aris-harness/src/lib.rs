//! Deterministic simulation support for ARIS client model-based tests.
//!
//! [`SimEnvironment`] stands in for [`aris_core::Environment`] in tests that
//! exercise keep-alive and beacon-expiry timing without real clocks.

pub mod sim_env;

pub use sim_env::{SimEnvironment, SimInstant};
