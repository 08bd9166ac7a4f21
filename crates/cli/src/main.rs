//! edge-flow daemon: pointer-edge host switching for multi-host receivers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edge_flow_core::channel::DeviceChannel;
use edge_flow_core::engine::{HostTarget, SwitchEngine, SWITCH_THRESHOLD};
use edge_flow_core::{config, device};

mod platform;

#[derive(Parser)]
#[command(
    name = "edge-flow",
    version,
    about = "Switch multi-host receiver hosts when the pointer crosses a screen edge"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected multi-host receivers.
    ListDevices,
    /// Watch the pointer and switch hosts at the screen edges.
    Run {
        /// Command for the left edge, DEVICE:HOST (repeatable, runs in order).
        #[arg(long = "left", value_name = "DEVICE:HOST", value_parser = config::parse_target)]
        left: Vec<HostTarget>,
        /// Command for the right edge, DEVICE:HOST (repeatable, runs in order).
        #[arg(long = "right", value_name = "DEVICE:HOST", value_parser = config::parse_target)]
        right: Vec<HostTarget>,
        /// Cooldown between switches, in milliseconds.
        #[arg(long, value_name = "MS", default_value_t = SWITCH_THRESHOLD.as_millis() as u64)]
        cooldown_ms: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ListDevices => list_devices(),
        Commands::Run {
            left,
            right,
            cooldown_ms,
        } => run(left, right, cooldown_ms),
    }
}

fn list_devices() -> Result<()> {
    let receivers = device::discover_receivers()?;
    if receivers.is_empty() {
        println!("No multi-host receivers found.");
        println!("Ensure the receiver is plugged in and accessible.");
    } else {
        for recv in &receivers {
            println!(
                "{} (VID: 0x{:04X}, PID: 0x{:04X}, path: {})",
                recv.model.name(),
                recv.vid,
                recv.pid,
                recv.path
            );
        }
    }
    Ok(())
}

fn run(left: Vec<HostTarget>, right: Vec<HostTarget>, cooldown_ms: u64) -> Result<()> {
    let actions = config::edge_actions(left, right)?;

    let receivers = device::discover_receivers()?;
    let receiver = receivers
        .first()
        .context("no multi-host receiver found; run `edge-flow list-devices` to check")?;
    let handle = device::open_receiver(receiver)?;
    tracing::info!(
        receiver = receiver.model.name(),
        path = %receiver.path,
        "receiver opened"
    );

    let engine = SwitchEngine::new(
        DeviceChannel::new(Box::new(handle)),
        platform::desktop()?,
        actions,
        Duration::from_millis(cooldown_ms),
    );

    platform::run_event_loop(Arc::new(Mutex::new(engine)))
}
