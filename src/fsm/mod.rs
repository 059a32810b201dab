//! Function-pointer state machine for the lock.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable (indexed by LockMode ordinal)                     │
//! │  ┌──────────────────────────┬───────────┬───────────────────┐ │
//! │  │ LockMode                 │ on_enter  │ on_update         │ │
//! │  ├──────────────────────────┼───────────┼───────────────────┤ │
//! │  │ Waiting                  │ fn(ctx)   │ fn(ctx)->Option<> │ │
//! │  │ AwaitingPassword         │ fn(ctx)   │ fn(ctx)->Option<> │ │
//! │  │ Open                     │ fn(ctx)   │ fn(ctx)->Option<> │ │
//! │  │ …                        │           │                   │ │
//! │  │ FireEmergency            │ fn(ctx)   │ fn(ctx)->Option<> │ │
//! │  └──────────────────────────┴───────────┴───────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entry actions are deferred: a transition only records the new mode
//! and clears `SystemState::initialized`.  The next dispatch sees the
//! cleared flag, runs `on_enter` once, sets the flag, then runs
//! `on_update` in the same tick.  Transitions requested from outside the
//! table (remote commands) therefore get exactly the same entry handling.

pub mod context;
pub mod credentials;
pub mod states;

use context::LockContext;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Every top-level mode of the lock.  The discriminant is the wire ordinal
/// used by remote mode-change requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LockMode {
    #[default]
    Waiting = 0,
    AwaitingPassword = 1,
    Open = 2,
    AdminAwaitingCard = 3,
    AdminAwaitingNewPassword = 4,
    MsgTimeout = 5,
    MsgAccessDenied = 6,
    AdminMsgSuccess = 7,
    AdminMsgFormatError = 8,
    AdminMsgCancelled = 9,
    FireEmergency = 10,
}

impl LockMode {
    /// Number of modes; sizes the dispatch table.
    pub const COUNT: usize = 11;

    pub const ALL: [LockMode; Self::COUNT] = [
        Self::Waiting,
        Self::AwaitingPassword,
        Self::Open,
        Self::AdminAwaitingCard,
        Self::AdminAwaitingNewPassword,
        Self::MsgTimeout,
        Self::MsgAccessDenied,
        Self::AdminMsgSuccess,
        Self::AdminMsgFormatError,
        Self::AdminMsgCancelled,
        Self::FireEmergency,
    ];

    /// `None` for ordinals outside the table.
    pub fn from_ordinal(ordinal: u16) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::AwaitingPassword => "AwaitingPassword",
            Self::Open => "Open",
            Self::AdminAwaitingCard => "AdminAwaitingCard",
            Self::AdminAwaitingNewPassword => "AdminAwaitingNewPassword",
            Self::MsgTimeout => "MsgTimeout",
            Self::MsgAccessDenied => "MsgAccessDenied",
            Self::AdminMsgSuccess => "AdminMsgSuccess",
            Self::AdminMsgFormatError => "AdminMsgFormatError",
            Self::AdminMsgCancelled => "AdminMsgCancelled",
            Self::FireEmergency => "FireEmergency",
        }
    }

    /// Result screens that return to `Waiting` after a fixed delay.
    pub const fn is_message(self) -> bool {
        matches!(
            self,
            Self::MsgTimeout
                | Self::MsgAccessDenied
                | Self::AdminMsgSuccess
                | Self::AdminMsgFormatError
                | Self::AdminMsgCancelled
        )
    }

    /// Modes in which the keypad is collecting a code.
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::AwaitingPassword | Self::AdminAwaitingNewPassword)
    }
}

impl core::fmt::Display for LockMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// One-time entry action.
pub type StateActionFn = fn(&mut LockContext<'_>);

/// Per-tick handler.  Returns `Some(next)` to transition.
pub type StateUpdateFn = fn(&mut LockContext<'_>) -> Option<LockMode>;

/// Static descriptor for a single mode.
pub struct StateDescriptor {
    pub mode: LockMode,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct LockMachine {
    table: [StateDescriptor; LockMode::COUNT],
}

impl Default for LockMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LockMachine {
    pub fn new() -> Self {
        Self {
            table: states::build_state_table(),
        }
    }

    /// Run one tick of the current mode: deferred entry action first,
    /// then the update handler.
    pub fn dispatch(&self, ctx: &mut LockContext<'_>) {
        let desc = &self.table[ctx.state.mode as usize];
        debug_assert_eq!(desc.mode, ctx.state.mode, "state table out of order");

        if !ctx.state.initialized {
            if let Some(enter) = desc.on_enter {
                enter(ctx);
            }
            ctx.state.initialized = true;
        }

        if let Some(next) = (desc.on_update)(ctx) {
            ctx.enter(next);
        }
    }
}
