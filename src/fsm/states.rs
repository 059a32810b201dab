//! Concrete mode handlers and the table builder.
//!
//! Each mode is two plain `fn` pointers, an optional entry action and a
//! per-tick update.  Updates never block on input: they poll the card
//! sensor and keypad once and return.  The only deliberate stalls are
//! the buzzer patterns.
//!
//! ```text
//!  Waiting ──[card]──▶ AwaitingPassword ──[# ok]──▶ Open ──[auto-lock]──▶ Waiting
//!     ▲                   │  │  │
//!     │        [timeout]──┘  │  └──[*]──────────────────────────────────▶ Waiting
//!     │                      └──[# bad]──▶ MsgAccessDenied ──[4 s]──┐
//!     └─────────────────────────────────────────────────────────────┘
//!
//!  AdminAwaitingCard ──[card]──▶ AdminAwaitingNewPassword ──[#/*]──▶ AdminMsg* ──▶ Waiting
//!  (remote) ──▶ FireEmergency ──[remote again]──▶ Waiting
//! ```

use log::{info, warn};

use super::context::LockContext;
use super::{LockMode, StateDescriptor};
use crate::animation::{
    LEVEL_AMBER, LEVEL_GREEN, LEVEL_RED, LEVEL_WARN, PULSE_ADMIN, PULSE_FIRE, PULSE_IDLE,
};
use crate::drivers::buzzer::{self, Melody};
use crate::link::MessageKind;
use crate::sensors::CardColor;
use crate::text::format_truncated;

/// Display line capacity.
const LINE: usize = 24;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the mode table.  Entry order must follow `LockMode` ordinals.
pub fn build_state_table() -> [StateDescriptor; LockMode::COUNT] {
    [
        StateDescriptor {
            mode: LockMode::Waiting,
            on_enter: Some(waiting_enter),
            on_update: waiting_update,
        },
        StateDescriptor {
            mode: LockMode::AwaitingPassword,
            on_enter: Some(awaiting_password_enter),
            on_update: awaiting_password_update,
        },
        StateDescriptor {
            mode: LockMode::Open,
            on_enter: Some(open_enter),
            on_update: open_update,
        },
        StateDescriptor {
            mode: LockMode::AdminAwaitingCard,
            on_enter: Some(admin_card_enter),
            on_update: admin_card_update,
        },
        StateDescriptor {
            mode: LockMode::AdminAwaitingNewPassword,
            on_enter: Some(admin_password_enter),
            on_update: admin_password_update,
        },
        StateDescriptor {
            mode: LockMode::MsgTimeout,
            on_enter: Some(message_enter),
            on_update: message_update,
        },
        StateDescriptor {
            mode: LockMode::MsgAccessDenied,
            on_enter: Some(message_enter),
            on_update: message_update,
        },
        StateDescriptor {
            mode: LockMode::AdminMsgSuccess,
            on_enter: Some(message_enter),
            on_update: message_update,
        },
        StateDescriptor {
            mode: LockMode::AdminMsgFormatError,
            on_enter: Some(message_enter),
            on_update: message_update,
        },
        StateDescriptor {
            mode: LockMode::AdminMsgCancelled,
            on_enter: Some(message_enter),
            on_update: message_update,
        },
        StateDescriptor {
            mode: LockMode::FireEmergency,
            on_enter: Some(fire_enter),
            on_update: fire_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Waiting
// ═══════════════════════════════════════════════════════════════════════════

fn waiting_enter(ctx: &mut LockContext<'_>) {
    ctx.publish(MessageKind::WaitingForCard, CardColor::None);
    ctx.anim.clear(&mut *ctx.hw);
    ctx.start_pulse(PULSE_IDLE);
    ctx.state.timers.display_refresh.cancel();
}

fn waiting_update(ctx: &mut LockContext<'_>) -> Option<LockMode> {
    if ctx.display_due() {
        ctx.show("BitDogLock 2FA", "Aproxime cartao", "");
    }

    let color = ctx.read_card();
    if color == CardColor::None {
        return None;
    }

    info!("card {} presented", color.label());
    ctx.state.active_color = color;
    ctx.state.timers.display_refresh.cancel();
    ctx.publish(MessageKind::CardRead, color);
    ctx.state.password.clear();
    let now = ctx.now();
    ctx.state
        .timers
        .password_timeout
        .start(now, ctx.config.password_timeout());
    Some(LockMode::AwaitingPassword)
}

// ═══════════════════════════════════════════════════════════════════════════
//  AwaitingPassword
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_password_enter(ctx: &mut LockContext<'_>) {
    ctx.publish(MessageKind::AwaitingPassword, ctx.state.active_color);
    ctx.set_solid(LEVEL_AMBER);
    ctx.state.animations.typing = true;
    ctx.state.timers.display_refresh.cancel();
}

fn awaiting_password_update(ctx: &mut LockContext<'_>) -> Option<LockMode> {
    let color = ctx.state.active_color;
    let now = ctx.now();

    if ctx.state.timers.password_timeout.expired(now) {
        info!("code entry timed out ({})", color.label());
        buzzer::timeout_beeps(&mut *ctx.hw);
        ctx.show("OPERACAO EXPIRADA", "Tempo esgotado", "");
        ctx.publish(MessageKind::PasswordTimeout, color);
        ctx.set_solid(LEVEL_WARN);
        ctx.state.animations.timeout = true;
        ctx.state.animations.typing = false;
        return Some(LockMode::MsgTimeout);
    }

    if ctx.display_due() {
        let remaining = ctx.state.timers.password_timeout.remaining_secs(now);
        let prompt = format_truncated::<LINE>(format_args!("Senha ({}):", color.label()));
        let clock = format_truncated::<LINE>(format_args!("Tempo: {}s", remaining));
        ctx.hw
            .show_lines(&prompt, ctx.state.password.as_str(), &clock);
    }

    let key = ctx.read_key()?;
    buzzer::key_click(&mut *ctx.hw);

    match key {
        '#' => {
            if ctx.passwords.matches(color, &ctx.state.password) {
                Some(open_sequence(ctx))
            } else {
                warn!("wrong code for card {}", color.label());
                ctx.hw.play_melody(Melody::Error);
                ctx.show("ACESSO NEGADO", "Senha Incorreta", "");
                ctx.publish(MessageKind::AccessDenied, color);
                ctx.set_solid(LEVEL_RED);
                ctx.state.animations.error = true;
                ctx.state.animations.typing = false;
                Some(LockMode::MsgAccessDenied)
            }
        }
        '*' => {
            info!("code entry cancelled");
            ctx.publish(MessageKind::Cancelled, color);
            ctx.state.animations.typing = false;
            Some(LockMode::Waiting)
        }
        other => {
            push_key(ctx, other);
            None
        }
    }
}

/// Append a typed key and redraw the entry line on the next tick.
fn push_key(ctx: &mut LockContext<'_>, key: char) {
    if ctx.state.password.push(key) {
        ctx.state.timers.display_refresh.cancel();
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Open / close sequences
// ═══════════════════════════════════════════════════════════════════════════

/// Grant access: feedback, release the latch, start the auto-lock window.
pub fn open_sequence(ctx: &mut LockContext<'_>) -> LockMode {
    let color = ctx.state.active_color;
    info!("access granted ({})", color.label());

    ctx.hw.play_melody(Melody::Success);
    ctx.state.animations.success = true;
    ctx.anim.clear(&mut *ctx.hw);
    ctx.set_solid(LEVEL_GREEN);
    ctx.show("ACESSO LIBERADO", "Bem-vindo!", "");

    ctx.move_latch(true);
    let now = ctx.now();
    ctx.state.timers.auto_lock.start(now, ctx.config.auto_lock());

    ctx.publish(MessageKind::SystemOpen, CardColor::None);
    ctx.publish(MessageKind::AccessGranted, color);
    LockMode::Open
}

/// Re-lock and go back to idle.
pub fn close_sequence(ctx: &mut LockContext<'_>) -> LockMode {
    ctx.show("", "Fechado", "");
    ctx.state.animations.closing = true;
    ctx.state.animations.countdown = false;
    ctx.set_solid(LEVEL_RED);
    ctx.move_latch(false);
    ctx.publish(MessageKind::SystemClosed, CardColor::None);
    LockMode::Waiting
}

fn open_enter(ctx: &mut LockContext<'_>) {
    ctx.state.animations.countdown = true;
    ctx.anim.reset_countdown();
    ctx.state.timers.display_refresh.cancel();
}

fn open_update(ctx: &mut LockContext<'_>) -> Option<LockMode> {
    let now = ctx.now();

    if ctx.state.timers.auto_lock.expired(now) {
        info!("auto-lock");
        ctx.publish(MessageKind::AutoLock, CardColor::None);
        ctx.state.animations.countdown = false;
        return Some(close_sequence(ctx));
    }

    if ctx.display_due() {
        let remaining = ctx.state.timers.auto_lock.remaining_secs(now);
        let line = format_truncated::<LINE>(format_args!("Travando em: {}s", remaining));
        ctx.show("Sistema Aberto", &line, "");
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  Administration
// ═══════════════════════════════════════════════════════════════════════════

const ADMIN_HEADER: &str = "--- MODO ADMIN ---";

fn admin_card_enter(ctx: &mut LockContext<'_>) {
    info!("admin: waiting for card to re-key");
    ctx.publish(MessageKind::AdminStarted, CardColor::None);
    ctx.show(ADMIN_HEADER, "Aproxime o cartao", "a ser configurado");
    ctx.publish(MessageKind::AdminMode, CardColor::None);
    ctx.anim.clear(&mut *ctx.hw);
    ctx.start_pulse(PULSE_ADMIN);
}

fn admin_card_update(ctx: &mut LockContext<'_>) -> Option<LockMode> {
    let color = ctx.read_card();
    if color == CardColor::None {
        return None;
    }
    ctx.state.active_color = color;
    ctx.anim.clear(&mut *ctx.hw);
    ctx.state.password.clear();
    Some(LockMode::AdminAwaitingNewPassword)
}

fn admin_password_enter(ctx: &mut LockContext<'_>) {
    let prompt = admin_prompt(ctx.state.active_color);
    ctx.show(ADMIN_HEADER, &prompt, "");
    ctx.set_solid(LEVEL_AMBER);
    ctx.state.animations.typing = true;
    let now = ctx.now();
    ctx.state
        .timers
        .display_refresh
        .start(now, ctx.config.display_refresh());
}

fn admin_prompt(color: CardColor) -> heapless::String<LINE> {
    format_truncated(format_args!("Nova Senha ({}):", color.label()))
}

fn admin_password_update(ctx: &mut LockContext<'_>) -> Option<LockMode> {
    let color = ctx.state.active_color;

    if ctx.display_due() {
        let prompt = admin_prompt(color);
        ctx.hw.show_lines(ADMIN_HEADER, &prompt, ctx.state.password.as_str());
    }

    let key = ctx.read_key()?;
    buzzer::key_click(&mut *ctx.hw);

    match key {
        '#' => {
            ctx.state.animations.typing = false;
            if ctx.state.password.is_complete() && ctx.passwords.set(color, &ctx.state.password) {
                info!("admin: code for card {} changed", color.label());
                ctx.show("SUCESSO!", "Senha Salva.", "");
                ctx.hw.play_melody(Melody::Success);
                ctx.set_solid(LEVEL_GREEN);
                ctx.publish(MessageKind::PasswordChanged, color);
                Some(LockMode::AdminMsgSuccess)
            } else {
                warn!("admin: new code must have 4 digits");
                ctx.show("ERRO", "Senha 4 digitos!", "");
                ctx.hw.play_melody(Melody::Error);
                ctx.set_solid(LEVEL_RED);
                Some(LockMode::AdminMsgFormatError)
            }
        }
        '*' => {
            info!("admin: cancelled");
            ctx.show(ADMIN_HEADER, "Operacao Cancelada", "");
            ctx.publish(MessageKind::Cancelled, CardColor::None);
            ctx.state.animations.typing = false;
            Some(LockMode::AdminMsgCancelled)
        }
        other => {
            push_key(ctx, other);
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Result screens
// ═══════════════════════════════════════════════════════════════════════════

fn message_enter(ctx: &mut LockContext<'_>) {
    let now = ctx.now();
    ctx.state
        .timers
        .message
        .start(now, ctx.config.message_display());
}

fn message_update(ctx: &mut LockContext<'_>) -> Option<LockMode> {
    let now = ctx.now();
    if ctx.state.timers.message.expired(now) {
        ctx.reset_visuals();
        return Some(LockMode::Waiting);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FireEmergency
// ═══════════════════════════════════════════════════════════════════════════

fn fire_enter(ctx: &mut LockContext<'_>) {
    warn!("fire alarm raised");
    ctx.reset_visuals();
    ctx.show("EMERGENCIA!", "ALARME DE INCENDIO", "PERIGO!");
    ctx.publish(MessageKind::FireAlarmOn, CardColor::None);

    let now = ctx.now();
    ctx.anim.start_fire(now);
    ctx.state.animations.fire = true;
    ctx.start_pulse(PULSE_FIRE);
    ctx.state
        .timers
        .alarm_beep
        .start(now, ctx.config.alarm_first_beep());

    ctx.move_latch(true);
}

fn fire_update(ctx: &mut LockContext<'_>) -> Option<LockMode> {
    let now = ctx.now();
    if ctx.state.timers.alarm_beep.expired(now) {
        buzzer::alarm_beep(&mut *ctx.hw);
        let now = ctx.now();
        ctx.state
            .timers
            .alarm_beep
            .start(now, ctx.config.alarm_period());
    }
    None
}

/// Silence the alarm and re-lock.
pub fn deactivate_emergency(ctx: &mut LockContext<'_>) -> LockMode {
    info!("fire alarm cleared");
    ctx.reset_visuals();
    ctx.state.timers.alarm_beep.cancel();
    ctx.hw.stop_continuous();
    ctx.anim.stop_fire(&mut *ctx.hw);
    ctx.state.animations.fire = false;
    ctx.publish(MessageKind::FireAlarmOff, CardColor::None);
    close_sequence(ctx)
}
