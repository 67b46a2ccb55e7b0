//! Command-channel payloads.
//!
//! Each variant below corresponds to one of the command-channel message
//! types listed in the external-interfaces description. The three-way
//! rotator split and the explicit `Stop` variant follow
//! `CommandBuilder`/`connect.c`'s command switch in the original SDK more
//! closely than the distilled wire description, which glosses both as
//! `SET_ROTATOR_*`.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Carrier frequency selection within a system type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// Low-frequency mode (longer range, lower resolution).
    Low,
    /// High-frequency mode (shorter range, higher resolution).
    High,
}

/// Full acoustic settings record, including the settings-request cookie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcousticSettings {
    /// Monotonically increasing per-session sequence number.
    pub cookie: u32,
    /// Requested frame rate in frames per second.
    pub frame_rate: f32,
    /// Raw ping mode value (1, 3, 6, or 9).
    pub ping_mode: u32,
    /// Carrier frequency selection.
    pub frequency: Frequency,
    /// Samples captured per beam.
    pub samples_per_beam: u32,
    /// Delay, in microseconds, before the first sample is captured.
    pub sample_start_delay: u32,
    /// Cycle period in microseconds.
    pub cycle_period: u32,
    /// Sample period in microseconds.
    pub sample_period: u32,
    /// Transmit pulse width in microseconds.
    pub pulse_width: u32,
    /// Whether the transmitter is enabled.
    pub enable_transmit: bool,
    /// Whether the 150V transmit rail is enabled.
    pub enable_150_volts: bool,
    /// Receiver gain, in device-defined units.
    pub receiver_gain: f32,
}

/// Water type, used by the depth conversion-factor lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterType {
    /// Salinity in `[0, 15)` ppt.
    Fresh,
    /// Salinity in `[15, 35)` ppt.
    Brackish,
    /// Salinity `>= 35` ppt.
    Salt,
}

/// Direction for a one-shot focus nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusDirection {
    /// Focus nearer.
    Near,
    /// Focus farther.
    Far,
}

/// Rotator axis addressed by a rotator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotatorAxis {
    /// Pan axis.
    Pan,
    /// Tilt axis.
    Tilt,
}

/// A command sent on the TCP control channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Set the device clock.
    SetDatetime {
        /// `YYYY-MMM-DD HH:MM:SS` formatted with invariant English month
        /// abbreviations (`Jan`..`Dec`).
        datetime: String,
    },
    /// Tell the device where to send the frame stream.
    SetFrameStreamReceiver {
        /// Destination UDP port.
        port: u16,
        /// Destination address; `None` means "use the command socket's
        /// source address" (unicast back to the host).
        address: Option<Ipv4Addr>,
    },
    /// Configure interpacket delay for the frame stream.
    SetFrameStreamSettings {
        /// Whether an interpacket delay is inserted.
        interpacket_delay_enabled: bool,
        /// Interpacket delay, in microseconds.
        interpacket_delay_us: u32,
    },
    /// Request a new acoustic settings configuration.
    SetAcoustics(AcousticSettings),
    /// Application-level keep-alive.
    Ping,
    /// Toggle telephoto lens mode.
    SetTelephoto {
        /// Whether telephoto mode is enabled.
        enabled: bool,
    },
    /// Set the absolute focus distance.
    SetFocus {
        /// Focus distance in meters.
        meters: f32,
    },
    /// Nudge the focus motor one step in a direction.
    ForceFocus {
        /// Direction to nudge.
        direction: FocusDirection,
    },
    /// Return the focus motor to its home position.
    HomeFocus,
    /// Set the water type used for depth conversion.
    SetSalinity {
        /// Water type.
        water_type: WaterType,
    },
    /// Set a rotator axis's target velocity.
    SetRotatorVelocity {
        /// Axis to command.
        axis: RotatorAxis,
        /// Target velocity, in device-defined units.
        velocity: f32,
    },
    /// Set a rotator axis's acceleration limit.
    SetRotatorAcceleration {
        /// Axis to command.
        axis: RotatorAxis,
        /// Acceleration limit, in device-defined units.
        acceleration: f32,
    },
    /// Set a rotator axis's absolute target position.
    SetRotatorPosition {
        /// Axis to command.
        axis: RotatorAxis,
        /// Target position, in device-defined units.
        position: f32,
    },
    /// Ask the device to stop streaming and release the session.
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acoustics_command_round_trip() {
        let command = Command::SetAcoustics(AcousticSettings {
            cookie: 1,
            frame_rate: 10.0,
            ping_mode: 9,
            frequency: Frequency::High,
            samples_per_beam: 1750,
            sample_start_delay: 930,
            cycle_period: 10_000,
            sample_period: 4,
            pulse_width: 24,
            enable_transmit: true,
            enable_150_volts: true,
            receiver_gain: 20.0,
        });
        let bytes = crate::payloads::encode(&command).expect("should encode");
        let decoded: Command = crate::payloads::decode(&bytes).expect("should decode");
        assert_eq!(command, decoded);
    }

    #[test]
    fn rotator_command_round_trip() {
        let command =
            Command::SetRotatorVelocity { axis: RotatorAxis::Pan, velocity: 1.5 };
        let bytes = crate::payloads::encode(&command).expect("should encode");
        let decoded: Command = crate::payloads::decode(&bytes).expect("should decode");
        assert_eq!(command, decoded);
    }

    #[test]
    fn set_datetime_round_trip() {
        let command = Command::SetDatetime { datetime: "2026-Jul-31 00:00:00".to_string() };
        let bytes = crate::payloads::encode(&command).expect("should encode");
        let decoded: Command = crate::payloads::decode(&bytes).expect("should decode");
        assert_eq!(command, decoded);
    }
}
