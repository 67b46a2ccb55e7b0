//! Networking layer for the ARIS sonar integration client: beacon
//! discovery, frame-stream reception, the command control channel, and the
//! header-update telemetry overlay.

pub mod beacon;
pub mod command_session;
pub mod connection;
pub mod error;
pub mod frame_stream;
pub mod header_update;

pub use beacon::{BEACON_PORT, BeaconEvent, BeaconListener};
pub use command_session::{COMMAND_PORT, CommandSession};
pub use connection::{Connection, ConnectionSetupError, CookieSequence, InitialSetup};
pub use error::{ConnectError, ControlChannelError};
pub use frame_stream::FrameStreamListener;
pub use header_update::{HEADER_UPDATE_PORT, HeaderUpdateSender};
