//! Breathing pulse for the RGB indicator.
//!
//! Brightness is a pure function of time since the pulse started, so
//! the effect needs no per-tick state beyond its start instant:
//!
//! ```text
//!   brightness(t) = (sin(t_ms · π / 1500) + 1) / 2      period 3 s
//! ```

use core::f32::consts::PI;

use super::Level;
use super::matrix::Rgb;
use crate::timer::Instant;

const HALF_PERIOD_MS: f32 = 1500.0;

/// 8-bit channel to 16-bit PWM duty.
const DUTY_PER_STEP: f32 = u16::MAX as f32 / 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PulseEffect {
    active: bool,
    start: Instant,
    base: Rgb,
}

impl PulseEffect {
    pub const fn new() -> Self {
        Self {
            active: false,
            start: Instant::BOOT,
            base: (0, 0, 0),
        }
    }

    pub fn start(&mut self, now: Instant, base: Rgb) {
        self.active = true;
        self.start = now;
        self.base = base;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn base(&self) -> Rgb {
        self.base
    }

    /// 0.0 ..= 1.0
    pub fn brightness(&self, now: Instant) -> f32 {
        let t_ms = now.saturating_since(self.start).as_micros() as f32 / 1000.0;
        ((t_ms * PI / HALF_PERIOD_MS).sin() + 1.0) / 2.0
    }

    /// Base colour scaled by the current brightness, 8-bit.
    pub fn scaled(&self, now: Instant) -> Rgb {
        let k = self.brightness(now);
        let (r, g, b) = self.base;
        (
            (f32::from(r) * k) as u8,
            (f32::from(g) * k) as u8,
            (f32::from(b) * k) as u8,
        )
    }

    /// Base colour scaled by the current brightness, as indicator duty.
    pub fn level(&self, now: Instant) -> Level {
        let k = self.brightness(now);
        let (r, g, b) = self.base;
        (
            (f32::from(r) * k * DUTY_PER_STEP) as u16,
            (f32::from(g) * k * DUTY_PER_STEP) as u16,
            (f32::from(b) * k * DUTY_PER_STEP) as u16,
        )
    }
}
