//! Frame-stepped visual effects for the LED matrix and RGB indicator.
//!
//! Each effect is a tiny state machine advanced once per control tick.
//! An `*_update` call returns immediately when its frame period has not
//! yet elapsed, so several effects can be live at once without stalling
//! the loop.  The one-shot effects return `true` exactly once, on the
//! tick they finish, and are then ready to run again from frame 0.
//!
//! | Effect    | Frames                                    | Period      |
//! |-----------|-------------------------------------------|-------------|
//! | Error     | cross+red, then off/on ×3 (6 transitions) | 200 ms      |
//! | Timeout   | "!"+amber, same blink pattern             | 200 ms      |
//! | Closing   | red ring 400 ms, blank 150 ms             | 400/150 ms  |
//! | Success   | dot → plus → ring, green                  | 120 ms      |
//! | Typing    | one cell per digit, level-triggered       | every tick  |
//! | Countdown | ring banded by seconds left               | on change   |
//! | Fire      | rising embers                             | 100 ms      |

pub mod fire;
pub mod matrix;
pub mod pulse;

use core::time::Duration;

use crate::app::ports::{IndicatorPort, MatrixPort};
use crate::timer::Instant;
use fire::FireSim;
use matrix::{MatrixFrame, Rgb};

pub use pulse::PulseEffect;

/// RGB indicator duty, 16 bits per channel.
pub type Level = (u16, u16, u16);

pub const PWM_MAX: u16 = u16::MAX;

// ── Indicator palette ─────────────────────────────────────────

pub const LEVEL_OFF: Level = (0, 0, 0);
pub const LEVEL_RED: Level = (PWM_MAX, 0, 0);
pub const LEVEL_GREEN: Level = (0, PWM_MAX, 0);
/// Full amber shown while a code is being typed.
pub const LEVEL_AMBER: Level = (PWM_MAX, PWM_MAX, 0);
/// Deeper amber used for warnings (timeout, countdown middle band).
pub const LEVEL_WARN: Level = (PWM_MAX, 20_000, 0);
pub const LEVEL_BOOT_WIFI: Level = (40_000, 15_000, 0);
pub const LEVEL_BOOT_BROKER: Level = (0, 20_000, 40_000);

// ── Pulse bases ───────────────────────────────────────────────

pub const PULSE_IDLE: Rgb = (0, 0, 255);
pub const PULSE_ADMIN: Rgb = (255, 0, 255);
pub const PULSE_FIRE: Rgb = (255, 0, 0);

const BLINK_PERIOD: Duration = Duration::from_millis(200);
const BLINK_TRANSITIONS: u8 = 6;
const CLOSING_HOLD: Duration = Duration::from_millis(400);
const CLOSING_GAP: Duration = Duration::from_millis(150);
const SUCCESS_PERIOD: Duration = Duration::from_millis(120);
const CLOSING_RED: Rgb = (200, 0, 0);

/// Countdown colour band by whole seconds remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownBand {
    Green,
    Amber,
    Red,
}

impl CountdownBand {
    pub fn for_remaining(secs: u32) -> Self {
        if secs > 10 {
            Self::Green
        } else if secs > 5 {
            Self::Amber
        } else {
            Self::Red
        }
    }

    pub fn ring(self) -> Rgb {
        match self {
            Self::Green => (0, 150, 0),
            Self::Amber => (255, 150, 0),
            Self::Red => (255, 0, 0),
        }
    }

    pub fn level(self) -> Level {
        match self {
            Self::Green => LEVEL_GREEN,
            Self::Amber => LEVEL_WARN,
            Self::Red => LEVEL_RED,
        }
    }
}

/// Frame index plus the instant the last frame was drawn.
#[derive(Debug, Clone, Copy, Default)]
struct Stepper {
    frame: u8,
    last: Instant,
}

impl Stepper {
    fn begin(&mut self, now: Instant) {
        self.frame = 1;
        self.last = now;
    }

    /// Advance the clock reference if `period` has elapsed.
    fn due(&mut self, now: Instant, period: Duration) -> bool {
        if now.saturating_since(self.last) < period {
            return false;
        }
        self.last = now;
        true
    }
}

fn show<H: MatrixPort + IndicatorPort + ?Sized>(hw: &mut H, frame: &MatrixFrame, level: Level) {
    hw.show_frame(frame);
    hw.set_indicator(level.0, level.1, level.2);
}

pub struct AnimationEngine {
    frame: MatrixFrame,
    error: Stepper,
    timeout: Stepper,
    closing: Stepper,
    success: Stepper,
    countdown: Option<CountdownBand>,
    fire: FireSim,
}

impl AnimationEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            frame: MatrixFrame::new(),
            error: Stepper::default(),
            timeout: Stepper::default(),
            closing: Stepper::default(),
            success: Stepper::default(),
            countdown: None,
            fire: FireSim::new(seed),
        }
    }

    /// Rewind every effect to frame 0 and stop the fire.
    pub fn reset(&mut self) {
        self.error = Stepper::default();
        self.timeout = Stepper::default();
        self.closing = Stepper::default();
        self.success = Stepper::default();
        self.countdown = None;
        self.fire.stop();
    }

    pub fn clear<H: MatrixPort + ?Sized>(&mut self, hw: &mut H) {
        self.frame.clear();
        hw.show_frame(&self.frame);
    }

    // ── One-shot effects ──────────────────────────────────────

    pub fn error_update<H>(&mut self, now: Instant, hw: &mut H) -> bool
    where
        H: MatrixPort + IndicatorPort + ?Sized,
    {
        blink(&mut self.error, &mut self.frame, now, matrix::draw_cross, LEVEL_RED, hw)
    }

    pub fn timeout_update<H>(&mut self, now: Instant, hw: &mut H) -> bool
    where
        H: MatrixPort + IndicatorPort + ?Sized,
    {
        blink(
            &mut self.timeout,
            &mut self.frame,
            now,
            matrix::draw_exclamation,
            LEVEL_AMBER,
            hw,
        )
    }

    pub fn closing_update<H>(&mut self, now: Instant, hw: &mut H) -> bool
    where
        H: MatrixPort + IndicatorPort + ?Sized,
    {
        let step = &mut self.closing;
        match step.frame {
            0 => {
                matrix::draw_ring(&mut self.frame, CLOSING_RED);
                show(hw, &self.frame, LEVEL_RED);
                step.begin(now);
                false
            }
            1 => {
                if step.due(now, CLOSING_HOLD) {
                    self.frame.clear();
                    show(hw, &self.frame, LEVEL_OFF);
                    step.frame = 2;
                }
                false
            }
            _ => {
                if step.due(now, CLOSING_GAP) {
                    step.frame = 0;
                    return true;
                }
                false
            }
        }
    }

    pub fn success_update<H>(&mut self, now: Instant, hw: &mut H) -> bool
    where
        H: MatrixPort + ?Sized,
    {
        let step = &mut self.success;
        if step.frame == 0 {
            matrix::draw_center_dot(&mut self.frame, matrix::OK_GREEN);
            hw.show_frame(&self.frame);
            step.begin(now);
            return false;
        }
        if !step.due(now, SUCCESS_PERIOD) {
            return false;
        }
        match step.frame {
            1 => matrix::draw_plus(&mut self.frame, matrix::OK_GREEN),
            2 => matrix::draw_ring(&mut self.frame, matrix::OK_GREEN),
            _ => {
                step.frame = 0;
                return true;
            }
        }
        hw.show_frame(&self.frame);
        step.frame += 1;
        false
    }

    // ── Continuous effects ────────────────────────────────────

    /// Light one cell per entered digit.
    pub fn typing_update<H: MatrixPort + ?Sized>(&mut self, digits: usize, hw: &mut H) {
        matrix::draw_digit_bar(&mut self.frame, digits);
        hw.show_frame(&self.frame);
    }

    /// Forget the last drawn band so the next update redraws.
    pub fn reset_countdown(&mut self) {
        self.countdown = None;
    }

    /// Redraw the countdown ring and indicator when the band changes.
    pub fn countdown_update<H>(&mut self, remaining_secs: u32, hw: &mut H)
    where
        H: MatrixPort + IndicatorPort + ?Sized,
    {
        let band = CountdownBand::for_remaining(remaining_secs);
        if self.countdown == Some(band) {
            return;
        }
        self.countdown = Some(band);
        matrix::draw_ring(&mut self.frame, band.ring());
        show(hw, &self.frame, band.level());
    }

    pub fn start_fire(&mut self, now: Instant) {
        self.fire.start(now);
    }

    pub fn stop_fire<H: MatrixPort + ?Sized>(&mut self, hw: &mut H) {
        self.fire.stop();
        self.clear(hw);
    }

    pub fn fire_update<H: MatrixPort + ?Sized>(&mut self, now: Instant, hw: &mut H) {
        if self.fire.step(now, &mut self.frame) {
            hw.show_frame(&self.frame);
        }
    }

    /// Single centred cell, used to echo the indicator pulse.
    pub fn center_dot<H: MatrixPort + ?Sized>(&mut self, colour: Rgb, hw: &mut H) {
        matrix::draw_center_dot(&mut self.frame, colour);
        hw.show_frame(&self.frame);
    }
}

/// Shared on/off blink used by the error and timeout effects.
///
/// Call 1 draws; calls 2–6 (each at least one period apart) alternate
/// off/on; call 7 blanks everything and reports completion.
fn blink<H>(
    step: &mut Stepper,
    frame: &mut MatrixFrame,
    now: Instant,
    glyph: fn(&mut MatrixFrame),
    level: Level,
    hw: &mut H,
) -> bool
where
    H: MatrixPort + IndicatorPort + ?Sized,
{
    if step.frame == 0 {
        glyph(frame);
        show(hw, frame, level);
        step.begin(now);
        return false;
    }
    if !step.due(now, BLINK_PERIOD) {
        return false;
    }
    if step.frame < BLINK_TRANSITIONS {
        if step.frame % 2 == 1 {
            frame.clear();
            show(hw, frame, LEVEL_OFF);
        } else {
            glyph(frame);
            show(hw, frame, level);
        }
        step.frame += 1;
        false
    } else {
        step.frame = 0;
        frame.clear();
        show(hw, frame, LEVEL_OFF);
        true
    }
}
