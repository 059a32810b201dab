//! BitDogLock host bench: both loops on the desktop.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  console thread ── stdin ──▶ PanelInput / remote commands     │
//! │                                                               │
//! │  control loop (main thread)        network loop (net-loop)    │
//! │  ┌──────────────────────┐          ┌──────────────────────┐   │
//! │  │ SimPanel             │  FIFO    │ SimBroker            │   │
//! │  │ LockService · boot   │◀────────▶│ NetworkWorker        │   │
//! │  └──────────────────────┘  words   └──────────────────────┘   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `bitdoglock-sim [config.json]`, log level via `RUST_LOG`.
#![deny(unused_must_use)]

use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bitdoglock::adapters::sim::{ConsoleCommand, PanelInput, SimPanel, parse_console_line};
use bitdoglock::adapters::sim_network::SimBroker;
use bitdoglock::adapters::time::{MonotonicClock, StdDelay};
use bitdoglock::app::ports::CommandPayload;
use bitdoglock::app::{LockService, boot};
use bitdoglock::config::LockConfig;
use bitdoglock::link::InterCoreFifo;
use bitdoglock::net;

/// Control-loop period.
const TICK: Duration = Duration::from_millis(1);

static FIFO: InterCoreFifo = InterCoreFifo::new();

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("BitDogLock bench v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config(std::env::args().nth(1).as_deref())?;

    // ── 3. Console and network loop ───────────────────────────
    let (panel_tx, panel_rx) = mpsc::channel();
    let (remote_tx, remote_rx) = mpsc::channel();
    spawn_console(panel_tx, remote_tx)?;

    let clock = MonotonicClock::new();
    net::task::spawn(
        config.clone(),
        SimBroker::new(remote_rx),
        FIFO.network_end(),
        clock,
    )
    .context("spawning network loop")?;

    // ── 4. Boot ───────────────────────────────────────────────
    let mut panel = SimPanel::new(panel_rx);
    let mut delay = StdDelay;
    let link = FIFO.control_end();
    let mut service = LockService::new(config, seed());

    if let Err(e) = boot::boot(&mut service, &mut panel, &link, &clock, &mut delay) {
        error!("boot failed: {} - halted, restart to retry", e);
        loop {
            std::thread::park();
        }
    }
    info!("ready: try `card green`, `key 1337#`, `remote fire`");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        service.tick(&mut panel, &link, &clock);
        std::thread::sleep(TICK);
    }
}

fn load_config(path: Option<&str>) -> Result<LockConfig> {
    let Some(path) = path else {
        info!("using built-in configuration");
        return Ok(LockConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let config: LockConfig =
        serde_json::from_str(&text).map_err(|e| anyhow!("parsing {}: {}", path, e))?;
    config.validate()?;
    info!("configuration loaded from {}", path);
    Ok(config)
}

fn spawn_console(panel: Sender<PanelInput>, remote: Sender<CommandPayload>) -> Result<()> {
    std::thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_console_line(&line) {
                    Some(ConsoleCommand::Panel(input)) => {
                        let _ = panel.send(input);
                    }
                    Some(ConsoleCommand::Remote(command)) => {
                        let _ = remote.send(command);
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!("unrecognised input: {}", line.trim()),
                }
            }
        })
        .context("spawning console reader")?;
    Ok(())
}

/// Ember seed for the fire animation.
fn seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
