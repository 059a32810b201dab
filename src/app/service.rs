//! Control-core service, the hexagonal core of the lock.
//!
//! [`LockService`] owns the mode machine, the lock state, the animation
//! engine and the password book.  All I/O flows through port traits
//! passed in at each call, so the whole service runs against mocks.
//!
//! ```text
//!  LockPeripherals ──▶ ┌─────────────────────────┐ ──▶ FifoPort (publish requests)
//!                      │       LockService       │
//!  FifoPort (remote) ─▶│  FSM · animations · hb  │
//!                      └─────────────────────────┘
//! ```
//!
//! One [`tick`](LockService::tick) is one iteration of the control loop:
//!
//! 1. pop at most one inbound channel word and apply it,
//! 2. dispatch the current mode,
//! 3. advance the flag-driven animations,
//! 4. render the breathing pulse,
//! 5. request a heartbeat publish when due,
//! 6. release the servo once its move window has passed.

use log::{debug, info, warn};

use crate::animation::AnimationEngine;
use crate::config::LockConfig;
use crate::drivers::keypad::KeyDebouncer;
use crate::fsm::context::{LockContext, SystemState};
use crate::fsm::credentials::PasswordBook;
use crate::fsm::{LockMachine, LockMode, states};
use crate::link::{ChannelMessage, FifoPort, MessageKind};
use crate::sensors::CardColor;
use crate::timer::Clock;

use super::ports::LockPeripherals;

// ───────────────────────────────────────────────────────────────
// LockService
// ───────────────────────────────────────────────────────────────

pub struct LockService {
    machine: LockMachine,
    state: SystemState,
    anim: AnimationEngine,
    passwords: PasswordBook,
    keys: KeyDebouncer,
    config: LockConfig,
}

impl LockService {
    /// `seed` feeds the fire animation's ember generator.
    pub fn new(config: LockConfig, seed: u64) -> Self {
        Self {
            machine: LockMachine::new(),
            state: SystemState::new(),
            anim: AnimationEngine::new(seed),
            passwords: PasswordBook::from_defaults(&config.default_passwords),
            keys: KeyDebouncer::new(config.suppress_held_keys),
            config,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> LockMode {
        self.state.mode
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn passwords(&self) -> &PasswordBook {
        &self.passwords
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control-loop iteration.
    pub fn tick<H, L, C>(&mut self, hw: &mut H, link: &L, clock: &C)
    where
        H: LockPeripherals,
        L: FifoPort,
        C: Clock,
    {
        let machine = &self.machine;
        let mut ctx = LockContext {
            state: &mut self.state,
            anim: &mut self.anim,
            passwords: &mut self.passwords,
            keys: &mut self.keys,
            hw,
            link,
            clock,
            config: &self.config,
        };

        if let Some(word) = ctx.link.try_pop() {
            apply_inbound(&mut ctx, word);
        }

        machine.dispatch(&mut ctx);

        advance_animations(&mut ctx);
        render_pulse(&mut ctx);

        let now = ctx.now();
        let heartbeat = &mut ctx.state.timers.heartbeat;
        if heartbeat.expired(now) || !heartbeat.is_armed() {
            heartbeat.start(now, ctx.config.heartbeat());
            ctx.publish(MessageKind::Heartbeat, CardColor::None);
        }

        if ctx.state.timers.servo.expired(now) {
            ctx.hw.stop_servo();
        }
    }

    /// Blank every visual output and drop all running effects.
    pub fn reset_visuals<H, L, C>(&mut self, hw: &mut H, link: &L, clock: &C)
    where
        H: LockPeripherals,
        L: FifoPort,
        C: Clock,
    {
        let mut ctx = LockContext {
            state: &mut self.state,
            anim: &mut self.anim,
            passwords: &mut self.passwords,
            keys: &mut self.keys,
            hw,
            link,
            clock,
            config: &self.config,
        };
        ctx.reset_visuals();
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound channel words
// ───────────────────────────────────────────────────────────────

fn apply_inbound(ctx: &mut LockContext<'_>, word: u32) {
    match ChannelMessage::decode(word) {
        Ok(ChannelMessage::ModeChange { ordinal }) => apply_mode_change(ctx, ordinal),
        Ok(other) => debug!("control core ignores {:?}", other),
        Err(e) => warn!("undecodable channel word {:#010x}: {}", word, e),
    }
}

/// Remote mode request.  The emergency ordinal toggles; any other
/// ordinal abandons the current transaction, re-locks an open latch and
/// switches.  Unknown ordinals fall back to `Waiting`.
fn apply_mode_change(ctx: &mut LockContext<'_>, ordinal: u16) {
    let target = LockMode::from_ordinal(ordinal);

    if target == Some(LockMode::FireEmergency) {
        if ctx.state.mode == LockMode::FireEmergency {
            info!("remote: fire alarm off");
            let next = states::deactivate_emergency(ctx);
            ctx.enter(next);
        } else {
            info!("remote: fire alarm on");
            ctx.enter(LockMode::FireEmergency);
        }
        return;
    }

    let target = target.unwrap_or_else(|| {
        warn!("remote: unknown mode {}, resetting", ordinal);
        LockMode::Waiting
    });
    info!("remote: switch to {}", target);

    ctx.state.password.clear();
    ctx.reset_visuals();
    if ctx.state.mode == LockMode::FireEmergency {
        ctx.state.timers.alarm_beep.cancel();
        ctx.hw.stop_continuous();
    }
    if ctx.state.is_open {
        ctx.move_latch(false);
        ctx.publish(MessageKind::SystemClosed, CardColor::None);
    }
    ctx.enter(target);
}

// ───────────────────────────────────────────────────────────────
// Effects
// ───────────────────────────────────────────────────────────────

fn advance_animations(ctx: &mut LockContext<'_>) {
    let now = ctx.now();
    let flags = ctx.state.animations;

    if flags.error && ctx.anim.error_update(now, &mut *ctx.hw) {
        ctx.state.animations.error = false;
    }
    if flags.timeout && ctx.anim.timeout_update(now, &mut *ctx.hw) {
        ctx.state.animations.timeout = false;
    }
    if flags.closing && ctx.anim.closing_update(now, &mut *ctx.hw) {
        ctx.state.animations.closing = false;
    }
    if flags.success && ctx.anim.success_update(now, &mut *ctx.hw) {
        ctx.state.animations.success = false;
    }
    if flags.typing {
        if ctx.state.mode.is_typing() {
            let digits = ctx.state.password.len();
            ctx.anim.typing_update(digits, &mut *ctx.hw);
        } else {
            ctx.state.animations.typing = false;
        }
    }
    if flags.countdown {
        let remaining = ctx.state.timers.auto_lock.remaining_secs(now);
        ctx.anim.countdown_update(remaining, &mut *ctx.hw);
    }
    if flags.fire {
        ctx.anim.fire_update(now, &mut *ctx.hw);
    }
}

fn render_pulse(ctx: &mut LockContext<'_>) {
    if !ctx.state.pulse.is_active() {
        return;
    }
    let now = ctx.now();
    let (r, g, b) = ctx.state.pulse.level(now);
    ctx.hw.set_indicator(r, g, b);

    if matches!(
        ctx.state.mode,
        LockMode::Waiting | LockMode::AdminAwaitingCard
    ) {
        let colour = ctx.state.pulse.scaled(now);
        ctx.anim.center_dot(colour, &mut *ctx.hw);
    }
}
