//! Connection facade: composes the frame-stream listener and command
//! session behind a single lifetime, running the sonar's initial setup
//! sequence on connect.

use std::{
    net::{IpAddr, SocketAddr},
    sync::atomic::{AtomicU32, Ordering},
};

use aris_core::{Environment, Frame, Metrics};
use aris_proto::{AcousticSettings, Command, WaterType};
use tracing::info;

use crate::{
    command_session::{COMMAND_PORT, CommandSession},
    error::{ConnectError, ControlChannelError},
    frame_stream::FrameStreamListener,
};

/// Monotonically increasing per-session cookie generator, starting at 1.
#[derive(Debug, Default)]
pub struct CookieSequence(AtomicU32);

impl CookieSequence {
    /// A fresh sequence whose first value will be `1`.
    #[must_use]
    pub fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// The next cookie value.
    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Parameters for the initial command sequence run right after connect.
#[derive(Debug, Clone)]
pub struct InitialSetup {
    /// Device clock setting, `YYYY-MMM-DD HH:MM:SS`.
    pub datetime: String,
    /// System-type-defined default acoustic settings; the cookie field is
    /// overwritten with a freshly assigned value.
    pub acoustic_settings: AcousticSettings,
    /// Water type for the depth conversion.
    pub water_type: WaterType,
    /// Initial absolute focus distance, in meters.
    pub focus_meters: f32,
}

/// Composes the frame-stream listener and command session.
pub struct Connection<E: Environment> {
    frame_stream: FrameStreamListener,
    command_session: CommandSession<E>,
    cookies: CookieSequence,
}

impl<E: Environment> Connection<E> {
    /// Connect to a sonar at `sonar_addr` and run the initial setup
    /// sequence: set clock, set frame-stream receiver, request acoustic
    /// settings with a fresh cookie, set salinity, set focus.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] if either socket fails to establish, or the
    /// error from the first setup command that fails to send.
    pub async fn connect(
        env: E,
        sonar_addr: IpAddr,
        setup: InitialSetup,
    ) -> Result<Self, ConnectionSetupError> {
        let frame_stream =
            FrameStreamListener::bind_unicast(Some(sonar_addr)).map_err(ConnectionSetupError::Connect)?;
        let command_addr = SocketAddr::new(sonar_addr, COMMAND_PORT);
        let command_session =
            CommandSession::connect(env, command_addr).await.map_err(ConnectionSetupError::Connect)?;

        let cookies = CookieSequence::new();
        let mut connection = Self { frame_stream, command_session, cookies };
        connection.run_initial_setup(setup).await?;
        info!(%sonar_addr, "connection established");
        Ok(connection)
    }

    async fn run_initial_setup(&mut self, setup: InitialSetup) -> Result<(), ConnectionSetupError> {
        info!("running initial setup sequence");

        self.send_command(&Command::SetDatetime { datetime: setup.datetime })
            .await
            .map_err(ConnectionSetupError::Setup)?;

        self.send_command(&Command::SetFrameStreamReceiver {
            port: self.frame_stream.local_addr().port(),
            address: None,
        })
        .await
        .map_err(ConnectionSetupError::Setup)?;

        let mut acoustic_settings = setup.acoustic_settings;
        acoustic_settings.cookie = self.cookies.next();
        self.send_command(&Command::SetAcoustics(acoustic_settings))
            .await
            .map_err(ConnectionSetupError::Setup)?;

        self.send_command(&Command::SetSalinity { water_type: setup.water_type })
            .await
            .map_err(ConnectionSetupError::Setup)?;

        self.send_command(&Command::SetFocus { meters: setup.focus_meters })
            .await
            .map_err(ConnectionSetupError::Setup)?;

        Ok(())
    }

    /// Receive and process datagrams until a frame finishes.
    pub async fn recv_frame(&mut self) -> Option<Frame> {
        self.frame_stream.recv_frame().await
    }

    /// Send a command on the control channel.
    ///
    /// # Errors
    ///
    /// Returns [`ControlChannelError`] if encoding or sending fails.
    pub async fn send_command(&self, command: &Command) -> Result<(), ControlChannelError> {
        self.command_session.send_command(command).await
    }

    /// Assembler counters for the frame-stream listener.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        self.frame_stream.metrics()
    }

    /// Whether the command session has observed a sticky connection error.
    #[must_use]
    pub fn has_connection_error(&self) -> bool {
        self.command_session.has_connection_error()
    }

    /// Local address the frame-stream listener is bound to.
    #[must_use]
    pub fn frame_stream_addr(&self) -> SocketAddr {
        self.frame_stream.local_addr()
    }
}

/// Errors establishing a [`Connection`], distinguishing socket setup
/// failures from failures partway through the initial setup command
/// sequence.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionSetupError {
    /// The frame-stream or command socket failed to establish.
    #[error(transparent)]
    Connect(#[from] ConnectError),
    /// A command in the initial setup sequence failed to send.
    #[error("initial setup command failed: {0}")]
    Setup(#[source] ControlChannelError),
}
