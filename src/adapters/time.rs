//! Host time adapters.
//!
//! - [`MonotonicClock`] implements the [`Clock`] port on top of
//!   `std::time::Instant`, counting from construction.
//! - [`StdDelay`] implements `embedded_hal::delay::DelayNs` with
//!   `std::thread::sleep`.

use std::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::timer::{Clock, Instant};

/// Microseconds since the adapter was created.  Cheap to copy; copies
/// share the same origin, so both threads can read one timeline.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.origin.elapsed().as_micros() as u64)
    }
}

/// Blocking delay backed by the OS scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
