//! One-shot scan for ARIS sonars broadcasting availability beacons.
//!
//! # Usage
//!
//! ```bash
//! beacon_scan --timeout-secs 10
//! ```

use std::time::Duration;

use aris_client::{BeaconEvent, BeaconListener};
use aris_core::SystemEnvironment;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Scan for sonars broadcasting availability beacons and print what's found.
#[derive(Parser, Debug)]
#[command(name = "beacon_scan")]
#[command(about = "Scan for ARIS sonars broadcasting availability beacons")]
#[command(version)]
struct Args {
    /// How long to listen before printing results and exiting.
    #[arg(short, long, default_value = "5")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!(timeout_secs = args.timeout_secs, "listening for beacons");

    let mut listener = BeaconListener::bind(SystemEnvironment).await?;
    let deadline = tokio::time::sleep(Duration::from_secs(args.timeout_secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            () = &mut deadline => break,
            events = listener.recv() => {
                for event in events {
                    match event {
                        BeaconEvent::Added { serial_number, address, system_type } => {
                            tracing::info!(serial_number, %address, ?system_type, "found sonar");
                        },
                        BeaconEvent::Updated { serial_number, old_address, new_address } => {
                            tracing::info!(serial_number, %old_address, %new_address, "sonar moved");
                        },
                        BeaconEvent::Expired { serial_number } => {
                            tracing::info!(serial_number, "sonar expired");
                        },
                    }
                }
            },
        }
    }

    tracing::info!("scan finished");
    Ok(())
}
