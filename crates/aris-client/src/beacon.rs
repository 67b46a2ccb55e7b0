//! Beacon listener: tracks sonar units seen via periodic UDP availability
//! broadcasts.

use std::{
    collections::HashMap,
    net::SocketAddr,
    time::Duration,
};

use aris_core::Environment;
use aris_proto::{Availability, SystemType, payloads};
use socket2::{Domain, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{info, trace, warn};

use crate::error::ConnectError;

/// Well-known UDP port sonar units broadcast availability beacons on.
pub const BEACON_PORT: u16 = 56124;

/// How often the expiration sweep runs.
pub const EXPIRATION_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// How long a sonar may go unseen before it's considered gone.
pub const EXPIRY_AGE: Duration = Duration::from_secs(5);

/// A change in the set of sonars observed via beacon traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeaconEvent {
    /// A previously unseen serial number appeared.
    Added {
        /// The sonar's serial number.
        serial_number: u32,
        /// The address it is beaconing from.
        address: SocketAddr,
        /// Its system type.
        system_type: SystemType,
    },
    /// A known serial number is now beaconing from a different address.
    Updated {
        /// The sonar's serial number.
        serial_number: u32,
        /// The address it was previously seen at.
        old_address: SocketAddr,
        /// The address it is now beaconing from.
        new_address: SocketAddr,
    },
    /// A known serial number has not beaconed within [`EXPIRY_AGE`].
    Expired {
        /// The sonar's serial number.
        serial_number: u32,
    },
}

struct Sighting<I> {
    address: SocketAddr,
    system_type: SystemType,
    last_sighted: I,
}

/// Listens for ARIS availability beacons and tracks serial-number ->
/// address mappings.
pub struct BeaconListener<E: Environment> {
    socket: UdpSocket,
    local_addr: SocketAddr,
    env: E,
    by_serial: HashMap<u32, Sighting<E::Instant>>,
    by_address: HashMap<SocketAddr, u32>,
    recv_buf: Vec<u8>,
}

impl<E: Environment> BeaconListener<E> {
    /// Bind the beacon listener socket on [`BEACON_PORT`] with
    /// `SO_REUSEADDR` set, following the same socket2-then-convert pattern
    /// used for SSDP discovery sockets.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::FrameStreamBind`] if the socket cannot be
    /// created, configured, or bound.
    pub async fn bind(env: E) -> Result<Self, ConnectError> {
        Self::bind_on(env, BEACON_PORT).await
    }

    /// Bind the beacon listener on an arbitrary port, e.g. `0` for an
    /// ephemeral port in tests that would otherwise race each other for
    /// [`BEACON_PORT`].
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::FrameStreamBind`] if the socket cannot be
    /// created, configured, or bound.
    pub async fn bind_on(env: E, port: u16) -> Result<Self, ConnectError> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, None).map_err(ConnectError::FrameStreamBind)?;
        socket.set_reuse_address(true).map_err(ConnectError::FrameStreamBind)?;
        socket.set_nonblocking(true).map_err(ConnectError::FrameStreamBind)?;
        let bind_addr: SocketAddr = ([0, 0, 0, 0], port).into();
        socket.bind(&bind_addr.into()).map_err(ConnectError::FrameStreamBind)?;

        let std_socket: std::net::UdpSocket = socket.into();
        let local_addr = std_socket.local_addr().map_err(ConnectError::FrameStreamBind)?;
        let socket = UdpSocket::from_std(std_socket).map_err(ConnectError::FrameStreamBind)?;

        Ok(Self {
            socket,
            local_addr,
            env,
            by_serial: HashMap::new(),
            by_address: HashMap::new(),
            recv_buf: vec![0u8; 1024],
        })
    }

    /// The local address this listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Await and process a single beacon datagram, returning whatever
    /// events it produced.
    pub async fn recv(&mut self) -> Vec<BeaconEvent> {
        match self.socket.recv_from(&mut self.recv_buf).await {
            Ok((len, src)) => self.handle_datagram(&self.recv_buf[..len].to_vec(), src),
            Err(err) => {
                warn!(error = %err, "beacon socket recv failed");
                Vec::new()
            },
        }
    }

    fn handle_datagram(&mut self, bytes: &[u8], src: SocketAddr) -> Vec<BeaconEvent> {
        let availability: Availability = match payloads::decode(bytes) {
            Ok(value) => value,
            Err(err) => {
                trace!(error = %err, "failed to decode beacon payload");
                return Vec::new();
            },
        };

        self.observe(availability.serial_number, availability.system_type, src)
    }

    fn observe(&mut self, serial_number: u32, system_type: SystemType, address: SocketAddr) -> Vec<BeaconEvent> {
        let now = self.env.now();
        let mut events = Vec::new();

        match self.by_serial.get_mut(&serial_number) {
            Some(sighting) => {
                if sighting.address != address {
                    let old_address = sighting.address;
                    self.by_address.remove(&old_address);
                    self.by_address.insert(address, serial_number);
                    sighting.address = address;
                    events.push(BeaconEvent::Updated { serial_number, old_address, new_address: address });
                }
                sighting.system_type = system_type;
                sighting.last_sighted = now;
            },
            None => {
                self.by_address.insert(address, serial_number);
                self.by_serial.insert(serial_number, Sighting { address, system_type, last_sighted: now });
                info!(serial_number, %address, "new sonar observed via beacon");
                events.push(BeaconEvent::Added { serial_number, address, system_type });
            },
        }

        events
    }

    /// Remove sightings older than [`EXPIRY_AGE`], returning an
    /// [`BeaconEvent::Expired`] for each one. Call this roughly every
    /// [`EXPIRATION_CHECK_INTERVAL`].
    pub fn expire_stale(&mut self) -> Vec<BeaconEvent> {
        let now = self.env.now();
        let expired: Vec<u32> = self
            .by_serial
            .iter()
            .filter(|(_, sighting)| now - sighting.last_sighted >= EXPIRY_AGE)
            .map(|(serial_number, _)| *serial_number)
            .collect();

        for serial_number in &expired {
            if let Some(sighting) = self.by_serial.remove(serial_number) {
                self.by_address.remove(&sighting.address);
                info!(serial_number, "sonar beacon expired");
            }
        }

        expired.into_iter().map(|serial_number| BeaconEvent::Expired { serial_number }).collect()
    }

    /// Look up a currently-known sonar's address and system type.
    #[must_use]
    pub fn lookup(&self, serial_number: u32) -> Option<(SocketAddr, SystemType)> {
        self.by_serial.get(&serial_number).map(|s| (s.address, s.system_type))
    }

    /// Block (via repeated `recv`) until `serial_number` is observed,
    /// returning its address and system type.
    pub async fn find_by_serial(&mut self, serial_number: u32) -> (SocketAddr, SystemType) {
        if let Some(found) = self.lookup(serial_number) {
            return found;
        }
        loop {
            self.recv().await;
            if let Some(found) = self.lookup(serial_number) {
                return found;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use aris_core::SystemEnvironment;

    use super::*;

    #[tokio::test]
    async fn observe_new_serial_emits_added() {
        let mut listener = BeaconListener::bind_on(SystemEnvironment, 0).await.expect("bind");
        let addr: SocketAddr = "127.0.0.1:12345".parse().expect("valid addr");
        let events = listener.observe(42, SystemType::Aris1800, addr);
        assert_eq!(events, vec![BeaconEvent::Added { serial_number: 42, address: addr, system_type: SystemType::Aris1800 }]);
    }

    #[tokio::test]
    async fn address_change_emits_updated() {
        let mut listener = BeaconListener::bind_on(SystemEnvironment, 0).await.expect("bind");
        let addr_a: SocketAddr = "127.0.0.1:1".parse().expect("valid addr");
        let addr_b: SocketAddr = "127.0.0.1:2".parse().expect("valid addr");

        listener.observe(42, SystemType::Aris1800, addr_a);
        let events = listener.observe(42, SystemType::Aris1800, addr_b);
        assert_eq!(
            events,
            vec![BeaconEvent::Updated { serial_number: 42, old_address: addr_a, new_address: addr_b }]
        );
        assert_eq!(listener.lookup(42), Some((addr_b, SystemType::Aris1800)));
    }

    #[tokio::test]
    async fn repeat_sighting_from_same_address_emits_nothing() {
        let mut listener = BeaconListener::bind_on(SystemEnvironment, 0).await.expect("bind");
        let addr: SocketAddr = "127.0.0.1:1".parse().expect("valid addr");

        listener.observe(42, SystemType::Aris1800, addr);
        let events = listener.observe(42, SystemType::Aris1800, addr);
        assert!(events.is_empty());
    }
}
