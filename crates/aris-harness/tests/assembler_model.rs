//! End-to-end assembler scenarios, fed with the literal fragment sequences
//! used to specify the sliding-window assembler's transition table.

use aris_core::{Assembler, AssemblerAction};
use aris_proto::FramePart;
use bytes::Bytes;

fn chunk(byte: u8, len: usize) -> Bytes {
    Bytes::from(vec![byte; len])
}

fn first_part(frame_index: i32, data: Bytes, total: i32) -> FramePart {
    FramePart { frame_index, data_offset: 0, header: Some(Bytes::from_static(&[0u8; 4])), data, total_data_size: Some(total) }
}

fn part(frame_index: i32, data_offset: i32, data: Bytes) -> FramePart {
    FramePart { frame_index, data_offset, header: None, data, total_data_size: None }
}

#[test]
fn in_order_single_frame_three_fragments() {
    let mut assembler = Assembler::new();

    let a1 = assembler.process_packet(first_part(0, chunk(1, 600), 1800));
    assert!(matches!(a1.as_slice(), [AssemblerAction::SendAck { frame_index: 0, expected_data_offset: 600 }]));

    let a2 = assembler.process_packet(part(0, 600, chunk(2, 600)));
    assert!(matches!(a2.as_slice(), [AssemblerAction::SendAck { frame_index: 0, expected_data_offset: 1200 }]));

    let a3 = assembler.process_packet(part(0, 1200, chunk(3, 600)));
    assert!(matches!(
        a3.as_slice(),
        [
            AssemblerAction::SendAck { frame_index: 0, expected_data_offset: 1800 },
            AssemblerAction::EmitFrame(_)
        ]
    ));

    assert_eq!(assembler.metrics().complete_frame_count, 1);
    assert_eq!(assembler.metrics().finished_frame_count, 1);
}

#[test]
fn out_of_order_then_recovery() {
    let mut assembler = Assembler::new();

    assembler.process_packet(first_part(0, chunk(1, 600), 1800));

    // Arrives ahead of schedule: rejected, ack still requests 600.
    let rejected = assembler.process_packet(part(0, 1200, chunk(3, 600)));
    assert!(matches!(rejected.as_slice(), [AssemblerAction::SendAck { frame_index: 0, expected_data_offset: 600 }]));
    assert_eq!(assembler.metrics().total_packets_accepted, 1);

    // The missing middle fragment lands: accepted, ack now requests 1200.
    let accepted = assembler.process_packet(part(0, 600, chunk(2, 600)));
    assert!(matches!(accepted.as_slice(), [AssemblerAction::SendAck { frame_index: 0, expected_data_offset: 1200 }]));

    // Retry of the offset-1200 fragment now lands in order and completes.
    let completed = assembler.process_packet(part(0, 1200, chunk(3, 600)));
    assert!(matches!(
        completed.as_slice(),
        [
            AssemblerAction::SendAck { frame_index: 0, expected_data_offset: 1800 },
            AssemblerAction::EmitFrame(_)
        ]
    ));
    assert_eq!(assembler.metrics().complete_frame_count, 1);
}

#[test]
fn skip_flushes_incomplete_frame_and_counts_the_gap() {
    let mut assembler = Assembler::new();

    assembler.process_packet(first_part(0, chunk(1, 600), 1800));

    // Frame 2 arrives next: frame 0 (incomplete) flushes, frame 1 is skipped.
    let actions = assembler.process_packet(first_part(2, chunk(9, 600), 1800));
    assert!(matches!(
        actions.as_slice(),
        [AssemblerAction::EmitFrame(_), AssemblerAction::SendAck { frame_index: 2, expected_data_offset: 600 }]
    ));

    assert_eq!(assembler.metrics().finished_frame_count, 1);
    assert_eq!(assembler.metrics().complete_frame_count, 0);
    assert_eq!(assembler.metrics().skipped_frame_count, 1);
}

#[test]
fn packet_count_conservation_holds_across_a_mixed_sequence() {
    let mut assembler = Assembler::new();

    assembler.process_packet(first_part(0, chunk(1, 600), 1800));
    assembler.process_packet(part(0, 1200, chunk(3, 600))); // rejected
    assembler.process_packet(part(0, 600, chunk(2, 600))); // accepted
    assembler.process_packet(part(0, 1200, chunk(3, 600))); // accepted, completes
    assembler.process_packet(first_part(0, chunk(1, 600), 1800)); // stale duplicate, ignored

    let metrics = assembler.metrics();
    assert_eq!(
        metrics.total_packets_received,
        metrics.total_packets_accepted + metrics.total_packets_ignored + metrics.invalid_packet_count
    );
}
