//! Lock state and the per-tick context threaded through every handler.
//!
//! [`SystemState`] is the single aggregate owned by the control core.
//! [`LockContext`] borrows it for one tick together with the peripherals,
//! the outbound link and the clock, and offers the small set of actions
//! handlers compose (publish, show, set the indicator, move the latch).

use log::{debug, info, warn};

use super::LockMode;
use super::credentials::{PasswordBook, PasswordBuffer};
use crate::animation::matrix::Rgb;
use crate::animation::{AnimationEngine, LEVEL_OFF, Level, PulseEffect};
use crate::app::ports::LockPeripherals;
use crate::config::LockConfig;
use crate::drivers::keypad::KeyDebouncer;
use crate::link::{ChannelMessage, FifoPort, MessageKind};
use crate::sensors::{CardColor, classify};
use crate::timer::{Clock, Instant, Timer};

// ---------------------------------------------------------------------------
// Animation flags
// ---------------------------------------------------------------------------

/// Which frame-stepped effects the service should advance this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationFlags {
    pub error: bool,
    pub timeout: bool,
    pub closing: bool,
    pub success: bool,
    pub typing: bool,
    pub countdown: bool,
    pub fire: bool,
}

impl AnimationFlags {
    pub fn any(&self) -> bool {
        self.error
            || self.timeout
            || self.closing
            || self.success
            || self.typing
            || self.countdown
            || self.fire
    }
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct LockTimers {
    /// Servo drive window; the holding pulse is released on expiry.
    pub servo: Timer,
    pub password_timeout: Timer,
    pub auto_lock: Timer,
    pub display_refresh: Timer,
    /// Result-screen hold time.
    pub message: Timer,
    pub alarm_beep: Timer,
    pub heartbeat: Timer,
}

// ---------------------------------------------------------------------------
// SystemState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SystemState {
    pub mode: LockMode,
    /// Cleared on every mode change; set once the entry action has run.
    pub initialized: bool,
    /// Card of the transaction in progress.
    pub active_color: CardColor,
    pub password: PasswordBuffer,
    /// Latch commanded open.
    pub is_open: bool,
    pub animations: AnimationFlags,
    pub pulse: PulseEffect,
    pub timers: LockTimers,
    /// Last sensor read failed (suppresses repeated warnings).
    pub sensor_faulted: bool,
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemState {
    pub fn new() -> Self {
        Self {
            mode: LockMode::Waiting,
            initialized: false,
            active_color: CardColor::None,
            password: PasswordBuffer::new(),
            is_open: false,
            animations: AnimationFlags::default(),
            pulse: PulseEffect::new(),
            timers: LockTimers::default(),
            sensor_faulted: false,
        }
    }

    /// Switch mode and defer its entry action to the next dispatch.
    /// Entering `Waiting` also abandons the current transaction.
    pub fn enter(&mut self, mode: LockMode) {
        self.mode = mode;
        self.initialized = false;
        if mode == LockMode::Waiting {
            self.active_color = CardColor::None;
            self.password.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// LockContext
// ---------------------------------------------------------------------------

/// Everything a handler may touch during one control tick.
pub struct LockContext<'a> {
    pub state: &'a mut SystemState,
    pub anim: &'a mut AnimationEngine,
    pub passwords: &'a mut PasswordBook,
    pub keys: &'a mut KeyDebouncer,
    pub hw: &'a mut dyn LockPeripherals,
    pub link: &'a dyn FifoPort,
    pub clock: &'a dyn Clock,
    pub config: &'a LockConfig,
}

impl LockContext<'_> {
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Record a mode change.
    pub fn enter(&mut self, mode: LockMode) {
        info!("mode {} -> {}", self.state.mode, mode);
        self.state.enter(mode);
    }

    /// Ask the network core to publish an event.  Blocks while the
    /// channel is full.
    pub fn publish(&mut self, kind: MessageKind, color: CardColor) {
        debug!("publish request {:?} ({:?})", kind, color);
        self.link
            .push_blocking(ChannelMessage::publish(kind, color).encode());
    }

    pub fn show(&mut self, line1: &str, line2: &str, line3: &str) {
        self.hw.show_lines(line1, line2, line3);
    }

    /// Stop any pulse and hold the indicator at `level`.
    pub fn set_solid(&mut self, level: Level) {
        self.state.pulse.stop();
        self.hw.set_indicator(level.0, level.1, level.2);
    }

    pub fn start_pulse(&mut self, base: Rgb) {
        let now = self.now();
        self.state.pulse.start(now, base);
    }

    /// Blank the matrix and indicator and drop every running effect.
    pub fn reset_visuals(&mut self) {
        self.hw.set_indicator(LEVEL_OFF.0, LEVEL_OFF.1, LEVEL_OFF.2);
        self.anim.reset();
        self.anim.clear(&mut *self.hw);
        self.state.pulse.stop();
        self.state.animations = AnimationFlags::default();
    }

    /// Drive the latch and start the servo window.
    pub fn move_latch(&mut self, open: bool) {
        let angle = if open {
            self.config.servo_open_angle
        } else {
            self.config.servo_closed_angle
        };
        self.hw.move_servo(angle);
        let now = self.now();
        self.state.timers.servo.start(now, self.config.servo_move());
        self.state.is_open = open;
    }

    /// `true` when the display is due for a refresh; re-arms the period.
    pub fn display_due(&mut self) -> bool {
        let now = self.now();
        let timer = &mut self.state.timers.display_refresh;
        if timer.expired(now) || !timer.is_armed() {
            timer.start(now, self.config.display_refresh());
            return true;
        }
        false
    }

    /// Current card verdict.  A failed read counts as "no card".
    pub fn read_card(&mut self) -> CardColor {
        match self.hw.read_color() {
            Ok(reading) => {
                if self.state.sensor_faulted {
                    info!("colour sensor reads again");
                    self.state.sensor_faulted = false;
                }
                classify(&reading, self.config.clear_threshold)
            }
            Err(e) => {
                if !self.state.sensor_faulted {
                    warn!("colour sensor read failed: {}", e);
                    self.state.sensor_faulted = true;
                }
                CardColor::None
            }
        }
    }

    /// Next debounced key press.
    pub fn read_key(&mut self) -> Option<char> {
        let raw = self.hw.poll_key();
        self.keys.filter(raw)
    }
}
