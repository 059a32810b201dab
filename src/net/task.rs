//! Network-thread entry point.
//!
//! Associates once, reports the outcome, then runs the worker in a tight
//! cooperative loop with a short yield per iteration.  A failed
//! association ends the thread; the control core halts on the failure
//! report.

use std::io;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{error, info};

use crate::app::ports::{ConnectivityPort, NetworkClient};
use crate::config::LockConfig;
use crate::drivers::task_pin::{Core, spawn_on_core};
use crate::link::FifoPort;
use crate::timer::Clock;

use super::worker::NetworkWorker;

pub const NETWORK_STACK_KB: usize = 16;

/// Per-iteration yield.
const YIELD: Duration = Duration::from_millis(1);

/// Run the network loop on the calling thread.  Returns only when the
/// initial association fails.
pub fn run_network_loop<N, L, C>(config: &LockConfig, mut net: N, link: L, clock: C)
where
    N: ConnectivityPort + NetworkClient,
    L: FifoPort,
    C: Clock,
{
    let mut worker = NetworkWorker::new(config);
    if let Err(e) = worker.bootstrap(&mut net, &link) {
        error!("network loop stopped: {}", e);
        return;
    }
    info!("network loop running");
    loop {
        worker.tick(&mut net, &link, &clock);
        std::thread::sleep(YIELD);
    }
}

/// Spawn the network loop on its own core.
pub fn spawn<N, L, C>(config: LockConfig, net: N, link: L, clock: C) -> io::Result<JoinHandle<()>>
where
    N: ConnectivityPort + NetworkClient + Send + 'static,
    L: FifoPort + Send + 'static,
    C: Clock + Send + 'static,
{
    spawn_on_core(Core::Network, NETWORK_STACK_KB, "net-loop", move || {
        run_network_loop(&config, net, link, clock);
    })
}
