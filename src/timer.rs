//! Polled one-shot timers over a monotonic microsecond clock.
//!
//! Nothing here blocks or calls back: the control loop asks
//! [`Timer::expired`] once per tick and acts on the single `true` it
//! eventually gets.  A timer that has fired stays quiet until it is
//! re-armed with [`Timer::start`].
//!
//! ```text
//!   start(now, d)          expired(t < now+d)   expired(t >= now+d)   expired(..)
//!   ──────────────▶ ARMED ───── false ────────▶ true, DISARMED ──────▶ false
//! ```

use core::time::Duration;

// ── Instant ───────────────────────────────────────────────────

/// Microseconds since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant(u64);

impl Instant {
    pub const BOOT: Self = Self(0);

    pub const fn from_micros(us: u64) -> Self {
        Self(us)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1_000))
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    /// Time elapsed since `earlier`; zero if `earlier` is in the future.
    pub const fn saturating_since(self, earlier: Instant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

// ── Clock port ────────────────────────────────────────────────

/// Monotonic time source.  Implemented by the board timer on target and
/// by `std::time::Instant` (or a hand-advanced counter) on the host.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

// ── Timer ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    armed: bool,
    start: Instant,
    duration: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub const fn new() -> Self {
        Self {
            armed: false,
            start: Instant::BOOT,
            duration: Duration::ZERO,
        }
    }

    /// Arm (or re-arm) the timer.  Overwrites any previous window.
    pub fn start(&mut self, now: Instant, duration: Duration) {
        self.start = now;
        self.duration = duration;
        self.armed = true;
    }

    /// `true` exactly once per arming, on the first poll at or past the
    /// deadline.  Disarms itself when it fires.
    pub fn expired(&mut self, now: Instant) -> bool {
        if !self.armed {
            return false;
        }
        if now.saturating_since(self.start) >= self.duration {
            self.armed = false;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Window length minus whole elapsed seconds, clamped at zero.
    pub fn remaining_secs(&self, now: Instant) -> u32 {
        let elapsed = now.saturating_since(self.start).as_secs();
        self.duration.as_secs().saturating_sub(elapsed) as u32
    }
}
