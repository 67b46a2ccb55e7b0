//! End-to-end beacon discovery over real loopback UDP, driven by
//! [`SimEnvironment`]'s virtual clock so the expiry sweep is deterministic.

use aris_client::{BeaconEvent, BeaconListener};
use aris_harness::SimEnvironment;
use aris_proto::{Availability, SystemType, payloads};
use tokio::net::UdpSocket;

async fn send_beacon(availability: &Availability, port: u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind sender socket");
    let payload = payloads::encode(availability).expect("encode availability");
    socket.send_to(&payload, ("127.0.0.1", port)).await.expect("send beacon");
}

#[tokio::test]
async fn discovers_sonar_then_expires_it_after_virtual_time_advances() {
    let env = SimEnvironment::with_seed(7);
    let mut listener = BeaconListener::bind_on(env.clone(), 0).await.expect("bind beacon listener");
    let port = listener.local_addr().port();

    let availability =
        Availability { serial_number: 42, system_type: SystemType::Aris1800, connection_state: false };
    send_beacon(&availability, port).await;

    let events = listener.recv().await;
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], BeaconEvent::Added { serial_number: 42, .. }));
    assert!(listener.lookup(42).is_some());

    // Advance past EXPIRY_AGE without another sighting; the next sweep must
    // retire the entry.
    env.advance(std::time::Duration::from_secs(6));
    let expired = listener.expire_stale();
    assert_eq!(expired, vec![BeaconEvent::Expired { serial_number: 42 }]);
    assert!(listener.lookup(42).is_none());
}
