//! Core-assigned thread spawning.
//!
//! The lock runs one loop per core: the control loop owns every local
//! peripheral, the network loop owns the radio and the pub/sub client.
//! On the host bench both become ordinary named threads and the core
//! assignment is only logged.

use std::io;
use std::thread::{Builder, JoinHandle};

/// Logical core a loop is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Core {
    /// Core 0: state machine, sensors, actuators, feedback.
    Control = 0,
    /// Core 1: radio association, pub/sub session, publish queue.
    Network = 1,
}

/// Spawn `f` as the loop for `core` with an explicit stack size.
pub fn spawn_on_core<F>(
    core: Core,
    stack_kb: usize,
    name: &'static str,
    f: F,
) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    log::info!(
        "Spawning '{}' for {:?} core (sim, no pinning, stack={}KB)",
        name,
        core,
        stack_kb
    );

    Builder::new()
        .name(name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
}
