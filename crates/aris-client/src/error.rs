//! Error types for the networking layer.

use thiserror::Error;

/// Errors establishing or operating a [`crate::connection::Connection`].
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The frame-stream UDP socket could not be bound.
    #[error("failed to bind frame-stream socket: {0}")]
    FrameStreamBind(#[source] std::io::Error),

    /// The TCP connect to the sonar's command port failed.
    #[error("failed to connect to command port: {0}")]
    CommandConnect(#[source] std::io::Error),
}

/// Errors on an established [`crate::command_session::CommandSession`].
#[derive(Debug, Error)]
pub enum ControlChannelError {
    /// Encoding a command payload failed.
    #[error("failed to encode command: {0}")]
    Encode(#[from] aris_proto::WireError),

    /// Writing the command to the TCP stream failed.
    #[error("failed to send command: {0}")]
    Send(#[source] std::io::Error),
}
