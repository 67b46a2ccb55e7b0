//! Frame-stream listener: owns the UDP socket that receives `FramePart`
//! fragments and acks them back to the sonar.

use std::{
    collections::VecDeque,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use aris_core::{Assembler, AssemblerAction, Frame};
use aris_proto::{FramePartAck, payloads};
use socket2::{Domain, Socket, Type};
use tokio::{net::UdpSocket, sync::Mutex};
use tracing::{trace, warn};

use crate::error::ConnectError;

const DEFAULT_RECV_BUFFER_BYTES: usize = 4 * 1024 * 1024;

/// Owns the frame-stream UDP socket and the [`Assembler`] consuming it.
pub struct FrameStreamListener {
    socket: Arc<Mutex<Option<UdpSocket>>>,
    local_addr: SocketAddr,
    assembler: Assembler,
    peer_filter: Option<IpAddr>,
    recv_buf: Vec<u8>,
    ready_frames: VecDeque<Frame>,
}

impl FrameStreamListener {
    /// Bind to an ephemeral port on the wildcard address, for unicast frame
    /// streams.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::FrameStreamBind`] on any socket setup
    /// failure.
    pub fn bind_unicast(peer_filter: Option<IpAddr>) -> Result<Self, ConnectError> {
        let bind_addr: SocketAddr = ([0, 0, 0, 0], 0).into();
        Self::bind(bind_addr, None, peer_filter)
    }

    /// Bind to a fixed port on the wildcard address and join a multicast
    /// group, for multicast frame streams.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::FrameStreamBind`] on any socket setup
    /// failure.
    pub fn bind_multicast(group: Ipv4Addr, port: u16, peer_filter: Option<IpAddr>) -> Result<Self, ConnectError> {
        let bind_addr: SocketAddr = ([0, 0, 0, 0], port).into();
        Self::bind(bind_addr, Some(group), peer_filter)
    }

    fn bind(
        bind_addr: SocketAddr,
        join_group: Option<Ipv4Addr>,
        peer_filter: Option<IpAddr>,
    ) -> Result<Self, ConnectError> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, None).map_err(ConnectError::FrameStreamBind)?;
        socket.set_reuse_address(true).map_err(ConnectError::FrameStreamBind)?;
        socket
            .set_recv_buffer_size(DEFAULT_RECV_BUFFER_BYTES)
            .map_err(ConnectError::FrameStreamBind)?;
        socket.set_nonblocking(true).map_err(ConnectError::FrameStreamBind)?;
        socket.bind(&bind_addr.into()).map_err(ConnectError::FrameStreamBind)?;

        if let Some(group) = join_group {
            socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED).map_err(ConnectError::FrameStreamBind)?;
        }

        let std_socket: std::net::UdpSocket = socket.into();
        let local_addr = std_socket.local_addr().map_err(ConnectError::FrameStreamBind)?;
        let socket = UdpSocket::from_std(std_socket).map_err(ConnectError::FrameStreamBind)?;

        Ok(Self {
            socket: Arc::new(Mutex::new(Some(socket))),
            local_addr,
            assembler: Assembler::new(),
            peer_filter,
            recv_buf: vec![0u8; 65536],
            ready_frames: VecDeque::new(),
        })
    }

    /// The local address this listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Cumulative assembler counters.
    #[must_use]
    pub fn metrics(&self) -> &aris_core::Metrics {
        self.assembler.metrics()
    }

    /// Receive and process datagrams until a frame finishes, returning it.
    /// Returns `None` if the socket has been closed.
    ///
    /// A single datagram's actions can include more than one
    /// [`AssemblerAction::EmitFrame`] (a skip-flush of the previous frame
    /// followed by immediate completion of the new one); all acks in the
    /// batch are sent and all completed frames are queued before this
    /// returns, so later frames from the same batch are handed out on
    /// subsequent calls rather than dropped.
    pub async fn recv_frame(&mut self) -> Option<Frame> {
        loop {
            if let Some(frame) = self.ready_frames.pop_front() {
                return Some(frame);
            }

            let (len, src) = {
                let guard = self.socket.lock().await;
                let socket = guard.as_ref()?;
                match socket.recv_from(&mut self.recv_buf).await {
                    Ok(result) => result,
                    Err(err) => {
                        warn!(error = %err, "frame-stream recv failed");
                        continue;
                    },
                }
            };

            if let Some(expected) = self.peer_filter {
                if src.ip() != expected {
                    trace!(%src, "dropping datagram from unexpected peer");
                    continue;
                }
            }

            let actions = self.assembler.process_datagram(&self.recv_buf[..len].to_vec());
            for action in actions {
                match action {
                    AssemblerAction::SendAck { frame_index, expected_data_offset } => {
                        self.send_ack(src, frame_index, expected_data_offset).await;
                    },
                    AssemblerAction::EmitFrame(frame) => self.ready_frames.push_back(frame),
                }
            }
        }
    }

    async fn send_ack(&self, target: SocketAddr, frame_index: i32, expected_data_offset: i32) {
        let guard = self.socket.lock().await;
        let Some(socket) = guard.as_ref() else { return };

        match payloads::encode(&FramePartAck { frame_index, data_offset: expected_data_offset }) {
            Ok(bytes) => {
                if let Err(err) = socket.send_to(&bytes, target).await {
                    trace!(error = %err, "ack send failed (best-effort)");
                }
            },
            Err(err) => warn!(error = %err, "failed to encode ack"),
        }
    }

    /// Close the socket. Any ack in flight sees `None` and returns without
    /// sending.
    pub async fn close(&self) {
        *self.socket.lock().await = None;
    }
}
