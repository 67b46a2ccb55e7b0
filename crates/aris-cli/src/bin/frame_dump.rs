//! Connects to a sonar, streams frames, and writes them to a recording.
//!
//! # Usage
//!
//! ```bash
//! frame_dump --sonar 192.168.1.14 --out session.aris
//! ```

use std::net::IpAddr;

use aris_client::{Connection, InitialSetup};
use aris_core::{RecordingWriter, SystemEnvironment, reorder};
use aris_proto::{AcousticSettings, Frequency, WaterType};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Stream frames from an ARIS sonar to a recording file.
#[derive(Parser, Debug)]
#[command(name = "frame_dump")]
#[command(about = "Stream frames from an ARIS sonar to a recording file")]
#[command(version)]
struct Args {
    /// Sonar IP address.
    #[arg(short, long)]
    sonar: IpAddr,

    /// Output recording path.
    #[arg(short, long, default_value = "capture.aris")]
    out: String,

    /// Number of frames to capture before exiting.
    #[arg(short, long, default_value = "100")]
    frames: usize,

    /// Initial absolute focus distance, in meters.
    #[arg(long, default_value = "1.0")]
    focus_meters: f32,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("frame_dump starting");
    tracing::info!(sonar = %args.sonar, out = %args.out, "connecting");

    let setup = InitialSetup {
        datetime: current_datetime(),
        acoustic_settings: default_acoustic_settings(),
        water_type: WaterType::Salt,
        focus_meters: args.focus_meters,
    };

    let mut connection = Connection::connect(SystemEnvironment, args.sonar, setup).await?;
    tracing::info!(local_addr = %connection.frame_stream_addr(), "frame-stream listener bound");

    let mut writer = RecordingWriter::create(&args.out)?;

    while writer.frame_count() < args.frames as u32 {
        if connection.has_connection_error() {
            tracing::warn!("command session reported a sticky connection error, stopping");
            break;
        }

        let Some(mut frame) = connection.recv_frame().await else {
            tracing::warn!("frame-stream listener closed, stopping");
            break;
        };

        let ping_mode = match aris_core::PingMode::from_raw(frame.header.ping_mode()) {
            Some(mode) => mode,
            None => {
                tracing::warn!(raw = frame.header.ping_mode(), "unrecognized ping mode, skipping frame");
                continue;
            },
        };
        let samples_per_beam = frame.header.samples_per_beam() as usize;
        reorder::reorder(&mut frame.header, ping_mode, samples_per_beam, &mut frame.samples);

        writer.write_frame(frame.header, &frame.samples)?;
        tracing::debug!(frame_count = writer.frame_count(), "frame written");
    }

    let metrics = connection.metrics();
    tracing::info!(
        complete_frames = metrics.complete_frame_count,
        finished_frames = metrics.finished_frame_count,
        skipped_frames = metrics.skipped_frame_count,
        "capture finished"
    );

    Ok(())
}

fn default_acoustic_settings() -> AcousticSettings {
    AcousticSettings {
        cookie: 0,
        frame_rate: 10.0,
        ping_mode: 9,
        frequency: Frequency::High,
        samples_per_beam: 1000,
        sample_start_delay: 0,
        cycle_period: 0,
        sample_period: 0,
        pulse_width: 0,
        enable_transmit: true,
        enable_150_volts: true,
        receiver_gain: 12.0,
    }
}

fn current_datetime() -> String {
    // Device clock format is `YYYY-MMM-DD HH:MM:SS` with invariant English
    // month names.
    chrono::Utc::now().format("%Y-%b-%d %H:%M:%S").to_string()
}
