//! Header-update overlay sender (UDP port 700).

use std::net::SocketAddr;

use aris_proto::{HeaderUpdateBody, HeaderUpdatePrefix};
use tokio::net::UdpSocket;
use zerocopy::IntoBytes;

use crate::error::ConnectError;

/// Well-known UDP port the header-update overlay is sent to.
pub const HEADER_UPDATE_PORT: u16 = 700;

/// Sends header-update overlay datagrams to a sonar, tracking the packet
/// sequence number the device expects to see incrementing.
pub struct HeaderUpdateSender {
    socket: UdpSocket,
    target: SocketAddr,
    next_pkt_num: u16,
}

impl HeaderUpdateSender {
    /// Bind an ephemeral UDP socket for sending header-update datagrams to
    /// `target` (expected to carry [`HEADER_UPDATE_PORT`]).
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::FrameStreamBind`] if the socket cannot be
    /// bound.
    pub async fn bind(target: SocketAddr) -> Result<Self, ConnectError> {
        let socket =
            UdpSocket::bind(("0.0.0.0", 0)).await.map_err(ConnectError::FrameStreamBind)?;
        Ok(Self { socket, target, next_pkt_num: 1 })
    }

    /// Send one header-update datagram, assigning the next packet sequence
    /// number.
    pub async fn send(&mut self, body: &HeaderUpdateBody) -> std::io::Result<()> {
        #[allow(clippy::cast_possible_truncation)]
        let prefix = HeaderUpdatePrefix::new(HeaderUpdateBody::SIZE as u16, self.next_pkt_num);
        self.next_pkt_num = self.next_pkt_num.wrapping_add(1).max(1);

        let mut datagram = Vec::with_capacity(HeaderUpdatePrefix::SIZE + HeaderUpdateBody::SIZE);
        datagram.extend_from_slice(prefix.as_bytes());
        datagram.extend_from_slice(body.as_bytes());

        self.socket.send_to(&datagram, self.target).await?;
        Ok(())
    }
}
