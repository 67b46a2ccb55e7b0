//! Sliding-window frame assembler: turns a stream of [`FramePart`] fragments
//! into complete [`Frame`]s.
//!
//! `process_packet` is a pure state machine: it mutates the assembler's
//! internal state and returns the actions a driver should perform (send an
//! ack, emit a finished frame). It never invokes a callback itself and never
//! recurses into flush, so no lock is needed around it; a single call site
//! with no re-entrancy means ordinary `&mut self` suffices.

use aris_proto::{ArisFrameHeader, FramePart};
use tracing::debug;

use crate::{error::AssemblerError, frame_builder::FrameBuilder, metrics::Metrics};

/// A fully assembled frame: fixed-size header plus reordered-or-not sample
/// bytes.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The frame's 1024-byte header, zero-extended from whatever prefix
    /// arrived on the wire.
    pub header: ArisFrameHeader,
    /// Sample bytes, in channel-interleaved order until [`crate::reorder`]
    /// runs.
    pub samples: Vec<u8>,
}

/// An action the driver (typically the frame-stream listener) must perform
/// in response to a processed packet.
#[derive(Debug, Clone)]
pub enum AssemblerAction {
    /// Send an ack to the packet's source address.
    SendAck {
        /// Frame index to ack.
        frame_index: i32,
        /// Next byte offset the assembler expects.
        expected_data_offset: i32,
    },
    /// A frame has been retired; hand it to the host.
    EmitFrame(Frame),
}

/// Sliding-window assembler state.
#[derive(Debug, Clone)]
pub struct Assembler {
    current_frame_index: i32,
    last_finished_frame_index: i32,
    expected_data_offset: i32,
    current_frame: Option<FrameBuilder>,
    metrics: Metrics,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// A fresh assembler with no frame in flight.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_frame_index: -1,
            last_finished_frame_index: -1,
            expected_data_offset: 0,
            current_frame: None,
            metrics: Metrics::new(),
        }
    }

    /// Cumulative counters observed so far.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Decode a raw datagram and process it. Malformed datagrams are
    /// counted and dropped before ever reaching [`Self::process_packet`].
    pub fn process_datagram(&mut self, bytes: &[u8]) -> Vec<AssemblerAction> {
        self.metrics.total_packets_received += 1;
        match FramePart::decode(bytes) {
            Ok(part) => self.process_decoded(part),
            Err(err) => {
                debug!(error = %err, "dropping malformed wire packet");
                self.metrics.invalid_packet_count += 1;
                self.metrics.total_packets_ignored += 1;
                Vec::new()
            },
        }
    }

    /// Process an already-decoded fragment.
    pub fn process_packet(&mut self, part: FramePart) -> Vec<AssemblerAction> {
        self.metrics.total_packets_received += 1;
        self.process_decoded(part)
    }

    fn process_decoded(&mut self, part: FramePart) -> Vec<AssemblerAction> {
        let mut actions = Vec::new();
        let fi = part.frame_index;

        if fi > self.current_frame_index {
            if let Some(frame) = self.flush() {
                actions.push(AssemblerAction::EmitFrame(frame));
            }
            let skipped = fi - self.current_frame_index - 1;
            if skipped > 0 {
                #[allow(clippy::cast_sign_loss)]
                {
                    self.metrics.skipped_frame_count += skipped as u64;
                }
            }
            self.current_frame_index = fi;
            self.expected_data_offset = 0;
        } else if fi <= self.last_finished_frame_index {
            debug!(frame_index = fi, "dropping duplicate or late part for a retired frame");
            self.metrics.total_packets_ignored += 1;
            return actions;
        }

        match &mut self.current_frame {
            None => {
                if part.data_offset == 0 {
                    if !self.start_frame(fi, part) {
                        // Malformed first part: no builder was created, the
                        // packet is already counted as invalid/ignored, and
                        // no ack is sent for it.
                        return actions;
                    }
                }
                // Else: no builder yet and this isn't the first fragment;
                // the ack below will request offset 0, prompting the
                // sender to retransmit the first part.
            },
            Some(builder) => {
                if part.data_offset == self.expected_data_offset {
                    #[allow(clippy::cast_sign_loss)]
                    let copied = builder.append(part.data_offset as usize, &part.data);
                    #[allow(clippy::cast_possible_wrap)]
                    {
                        self.expected_data_offset += copied as i32;
                    }
                    self.metrics.total_packets_accepted += 1;
                } else {
                    debug!(
                        frame_index = fi,
                        data_offset = part.data_offset,
                        expected = self.expected_data_offset,
                        "rejecting out-of-order part"
                    );
                }
            },
        }

        actions.push(AssemblerAction::SendAck {
            frame_index: self.current_frame_index,
            expected_data_offset: self.expected_data_offset,
        });

        let complete = self.current_frame.as_ref().is_some_and(FrameBuilder::is_complete);
        if complete {
            if let Some(frame) = self.flush() {
                actions.push(AssemblerAction::EmitFrame(frame));
            }
        }

        actions
    }

    /// Attempt to start a new frame from its first fragment. Returns
    /// `false` if the fragment was malformed, in which case no builder is
    /// created and the caller must not ack the packet.
    fn start_frame(&mut self, frame_index: i32, part: FramePart) -> bool {
        let (Some(header), Some(total_data_size)) = (part.header, part.total_data_size) else {
            debug!(frame_index, "malformed first part: missing header or total_data_size");
            self.metrics.invalid_packet_count += 1;
            self.metrics.total_packets_ignored += 1;
            return false;
        };

        match FrameBuilder::new(frame_index, header.to_vec(), &part.data, total_data_size) {
            Ok(builder) => {
                #[allow(clippy::cast_possible_wrap)]
                {
                    self.expected_data_offset = builder.bytes_received() as i32;
                }
                self.metrics.total_packets_accepted += 1;
                self.current_frame = Some(builder);
                true
            },
            Err(err) => {
                let err = AssemblerError::from(err);
                debug!(frame_index, error = %err, "malformed first part");
                self.metrics.invalid_packet_count += 1;
                self.metrics.total_packets_ignored += 1;
                false
            },
        }
    }

    /// Retire the current frame, if any, updating metrics and
    /// `last_finished_frame_index`.
    fn flush(&mut self) -> Option<Frame> {
        let builder = self.current_frame.take()?;
        let is_complete = builder.is_complete();
        #[allow(clippy::cast_possible_truncation)]
        let expected_size = builder.expected_size() as u64;
        #[allow(clippy::cast_possible_truncation)]
        let bytes_received = builder.bytes_received() as u64;
        let frame_index = builder.frame_index();
        let (header_bytes, samples) = builder.into_parts();

        self.metrics.unique_frame_index_count += 1;
        self.metrics.finished_frame_count += 1;
        if is_complete {
            self.metrics.complete_frame_count += 1;
        }
        self.metrics.total_expected_frame_size += expected_size;
        self.metrics.total_received_frame_size += bytes_received;
        self.last_finished_frame_index = frame_index;

        let header = ArisFrameHeader::from_wire_prefix(&header_bytes);
        Some(Frame { header, samples })
    }

    /// Force-retire whatever frame is currently in flight, e.g. on
    /// connection teardown.
    pub fn flush_pending(&mut self) -> Option<Frame> {
        self.flush()
    }
}
