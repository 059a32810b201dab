//! Fire-alarm ember simulation.
//!
//! Every frame the heat in each cell drifts one row up and cools, while
//! the bottom row is re-seeded with fresh embers.  Row 4 is the base.

use core::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::matrix::{HEIGHT, MatrixFrame, OFF, WIDTH};
use crate::timer::Instant;

pub const FRAME_PERIOD: Duration = Duration::from_millis(100);

const RED_DECAY: u8 = 10;
const GREEN_DECAY: u8 = 5;
/// Chance (percent) that a base cell ignites on a given frame.
const IGNITE_PERCENT: u32 = 60;

pub struct FireSim {
    active: bool,
    last_frame: Instant,
    rng: SmallRng,
}

impl FireSim {
    pub fn new(seed: u64) -> Self {
        Self {
            active: false,
            last_frame: Instant::BOOT,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.active = true;
        self.last_frame = now;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance one frame if the period has elapsed.  Returns whether the
    /// frame changed.
    pub fn step(&mut self, now: Instant, frame: &mut MatrixFrame) -> bool {
        if !self.active || now.saturating_since(self.last_frame) < FRAME_PERIOD {
            return false;
        }
        self.last_frame = now;

        for y in 0..HEIGHT - 1 {
            for x in 0..WIDTH {
                let (r, g, _) = frame.get(x, y + 1);
                frame.set(
                    x,
                    y,
                    (r.saturating_sub(RED_DECAY), g.saturating_sub(GREEN_DECAY), 0),
                );
            }
        }

        for x in 0..WIDTH {
            let ember = if self.rng.gen_range(0..100) < IGNITE_PERCENT {
                (self.rng.gen_range(200..=255), self.rng.gen_range(50..150), 0)
            } else {
                OFF
            };
            frame.set(x, HEIGHT - 1, ember);
        }
        true
    }
}
