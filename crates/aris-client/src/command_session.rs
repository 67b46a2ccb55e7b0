//! TCP command session: the control channel used to configure the sonar
//! and keep the connection alive.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use aris_core::Environment;
use aris_proto::{Command, payloads};
use tokio::{io::AsyncWriteExt, net::TcpStream, sync::Mutex, task::JoinHandle};
use tracing::{info, warn};

use crate::error::ControlChannelError;

/// Well-known TCP port the sonar's command channel listens on.
pub const COMMAND_PORT: u16 = 56888;

/// Interval between application-level keep-alive pings.
pub const KEEPALIVE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);

/// An established TCP control channel to a sonar.
///
/// Runs a background keep-alive task that pings the device every
/// [`KEEPALIVE_INTERVAL`]. If a ping send fails the session records a
/// sticky connection-error flag and the keep-alive task stops rearming
/// itself; the host observes [`CommandSession::has_connection_error`] and
/// tears the connection down. Sends are never retried.
pub struct CommandSession<E: Environment> {
    stream: Arc<Mutex<TcpStream>>,
    env: E,
    connection_error: Arc<AtomicBool>,
    keepalive_handle: Option<JoinHandle<()>>,
}

impl<E: Environment> CommandSession<E> {
    /// Connect to the sonar's command port and start the keep-alive task.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConnectError::CommandConnect`] if the TCP
    /// connect fails.
    pub async fn connect(env: E, addr: SocketAddr) -> Result<Self, crate::error::ConnectError> {
        let stream = TcpStream::connect(addr).await.map_err(crate::error::ConnectError::CommandConnect)?;
        let _ = stream.set_nodelay(true);

        let stream = Arc::new(Mutex::new(stream));
        let connection_error = Arc::new(AtomicBool::new(false));
        let keepalive_handle = Some(spawn_keepalive(Arc::clone(&stream), env.clone(), Arc::clone(&connection_error)));

        Ok(Self { stream, env, connection_error, keepalive_handle })
    }

    /// Send a command, framed as `u32 big-endian length || encoded command`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlChannelError::Encode`] if the command cannot be
    /// CBOR-encoded, or [`ControlChannelError::Send`] if the write fails.
    pub async fn send_command(&self, command: &Command) -> Result<(), ControlChannelError> {
        let payload = payloads::encode(command).map_err(ControlChannelError::Encode)?;
        write_framed(&self.stream, &payload).await
    }

    /// Whether a sticky connection error has been observed (currently only
    /// set by keep-alive ping failures).
    #[must_use]
    pub fn has_connection_error(&self) -> bool {
        self.connection_error.load(Ordering::SeqCst)
    }

    /// The environment driving this session's keep-alive timer.
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.env
    }
}

async fn write_framed(stream: &Mutex<TcpStream>, payload: &[u8]) -> Result<(), ControlChannelError> {
    #[allow(clippy::cast_possible_truncation)]
    let len = payload.len() as u32;
    let mut guard = stream.lock().await;
    guard.write_all(&len.to_be_bytes()).await.map_err(ControlChannelError::Send)?;
    guard.write_all(payload).await.map_err(ControlChannelError::Send)?;
    Ok(())
}

fn spawn_keepalive<E: Environment>(
    stream: Arc<Mutex<TcpStream>>,
    env: E,
    connection_error: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            env.sleep(KEEPALIVE_INTERVAL).await;

            let Ok(payload) = payloads::encode(&Command::Ping) else {
                warn!("failed to encode keep-alive ping, skipping this tick");
                continue;
            };

            match write_framed(&stream, &payload).await {
                Ok(()) => {},
                Err(err) => {
                    warn!(error = %err, "keep-alive ping failed, marking connection error");
                    connection_error.store(true, Ordering::SeqCst);
                    break;
                },
            }
        }
        info!("keep-alive task exiting");
    })
}

impl<E: Environment> Drop for CommandSession<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.keepalive_handle.take() {
            handle.abort();
        }
    }
}
