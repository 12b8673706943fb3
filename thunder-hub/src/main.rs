//! Thunder Sense hub: scans for boards and polls their sensors

use clap::{Parser, Subcommand};
use std::time::Duration;
use thunder_hub::{btle, HubConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "thunder-hub")]
#[command(about = "Poll Thunder Sense BLE sensor boards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to every board in range and poll it until interrupted
    Run {
        /// Advertised name prefix of boards to adopt
        #[arg(short, long, env = "THUNDER_PREFIX", default_value = thunder_proto::NAME_PREFIX)]
        prefix: String,
        /// Seconds between poll cycles
        #[arg(
            short,
            long,
            env = "THUNDER_INTERVAL",
            default_value = "10",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval: u64,
        /// Bluetooth adapter index
        #[arg(short, long, env = "THUNDER_ADAPTER", default_value = "0")]
        adapter: usize,
    },
    /// List nearby devices once
    Scan {
        /// Scan duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
        /// Advertised name prefix of boards to mark
        #[arg(short, long, env = "THUNDER_PREFIX", default_value = thunder_proto::NAME_PREFIX)]
        prefix: String,
        /// Bluetooth adapter index
        #[arg(short, long, env = "THUNDER_ADAPTER", default_value = "0")]
        adapter: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("thunder_hub=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            prefix,
            interval,
            adapter,
        } => {
            let config = HubConfig {
                name_prefix: prefix,
                poll_interval: Duration::from_secs(interval),
                adapter_index: adapter,
            };

            tokio::select! {
                result = btle::run(config) => result?,
                _ = tokio::signal::ctrl_c() => info!("interrupted, shutting down"),
            }
        }
        Commands::Scan {
            duration,
            prefix,
            adapter,
        } => {
            println!("Scanning for {} devices ({} seconds)...", prefix, duration);
            let devices = btle::scan(adapter, Duration::from_secs(duration), &prefix).await?;

            println!("\nFound {} devices:", devices.len());
            for device in devices {
                let rssi = device
                    .rssi
                    .map(|r| format!("{} dBm", r))
                    .unwrap_or_else(|| "N/A".to_string());
                let marker = if device.is_board { " [BOARD]" } else { "" };
                println!("  {} ({}) RSSI: {}{}", device.name, device.address, rssi, marker);
            }
        }
    }

    Ok(())
}
