//! Inter-core word protocol.
//!
//! Every message is a single `u32` so it fits one hardware FIFO slot:
//!
//! ```text
//!  31              16 15             8 7              0
//! ┌──────────────────┬────────────────┬────────────────┐
//! │   command code   │            payload              │
//! └──────────────────┴────────────────┴────────────────┘
//!   MODE_CHANGE        target LockMode ordinal
//!   PUBLISH            colour ordinal │ message kind
//!   LINK_ESTABLISHED   1 = up, 0 = failed
//!   BROKER_SESSION     (unused)
//! ```

use crate::error::ProtocolError;
use crate::fsm::LockMode;
use crate::sensors::CardColor;

/// Command codes carried in the upper half-word.
pub mod cmd {
    pub const MODE_CHANGE: u16 = 0xE5A0;
    pub const PUBLISH: u16 = 0xADD0;
    pub const LINK_ESTABLISHED: u16 = 0xFFFE;
    pub const BROKER_SESSION: u16 = 0xBEEF;
}

// ── Message kinds ─────────────────────────────────────────────

/// Telemetry events the control core asks the network core to publish.
/// The discriminant is the wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    WaitingForCard = 0,
    CardRead = 1,
    AwaitingPassword = 2,
    SystemOpen = 3,
    SystemClosed = 4,
    AdminMode = 5,
    AccessGranted = 6,
    AccessDenied = 7,
    PasswordTimeout = 8,
    AutoLock = 9,
    Cancelled = 10,
    AdminStarted = 11,
    PasswordChanged = 12,
    FireAlarmOn = 13,
    FireAlarmOff = 14,
    Heartbeat = 15,
}

impl MessageKind {
    pub const COUNT: usize = 16;

    pub const ALL: [MessageKind; Self::COUNT] = [
        Self::WaitingForCard,
        Self::CardRead,
        Self::AwaitingPassword,
        Self::SystemOpen,
        Self::SystemClosed,
        Self::AdminMode,
        Self::AccessGranted,
        Self::AccessDenied,
        Self::PasswordTimeout,
        Self::AutoLock,
        Self::Cancelled,
        Self::AdminStarted,
        Self::PasswordChanged,
        Self::FireAlarmOn,
        Self::FireAlarmOff,
        Self::Heartbeat,
    ];

    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }
}

/// Outcome of the wireless association, reported once at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum LinkStatus {
    Failed = 0,
    Up = 1,
}

// ── Messages ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMessage {
    /// Remote request to switch the lock into another mode.  The ordinal
    /// is kept raw so the control core can apply its own recovery policy
    /// to values it does not recognise.
    ModeChange { ordinal: u16 },
    Publish { kind: MessageKind, color: CardColor },
    LinkEstablished(LinkStatus),
    BrokerSessionEstablished,
}

impl ChannelMessage {
    pub const fn mode_change(mode: LockMode) -> Self {
        Self::ModeChange {
            ordinal: mode as u16,
        }
    }

    pub const fn publish(kind: MessageKind, color: CardColor) -> Self {
        Self::Publish { kind, color }
    }

    pub const fn encode(self) -> u32 {
        let (command, payload): (u16, u16) = match self {
            Self::ModeChange { ordinal } => (cmd::MODE_CHANGE, ordinal),
            Self::Publish { kind, color } => (cmd::PUBLISH, ((color as u16) << 8) | kind as u16),
            Self::LinkEstablished(status) => (cmd::LINK_ESTABLISHED, status as u16),
            Self::BrokerSessionEstablished => (cmd::BROKER_SESSION, 0),
        };
        ((command as u32) << 16) | payload as u32
    }

    pub fn decode(word: u32) -> Result<Self, ProtocolError> {
        let command = (word >> 16) as u16;
        let payload = (word & 0xFFFF) as u16;

        match command {
            cmd::MODE_CHANGE => Ok(Self::ModeChange { ordinal: payload }),
            cmd::PUBLISH => {
                let kind_byte = (payload & 0xFF) as u8;
                let kind = MessageKind::from_u8(kind_byte)
                    .ok_or(ProtocolError::UnknownMessageKind(kind_byte))?;
                let color = CardColor::from_u8((payload >> 8) as u8);
                Ok(Self::Publish { kind, color })
            }
            cmd::LINK_ESTABLISHED => Ok(Self::LinkEstablished(if payload == LinkStatus::Up as u16 {
                LinkStatus::Up
            } else {
                LinkStatus::Failed
            })),
            cmd::BROKER_SESSION => Ok(Self::BrokerSessionEstablished),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }

    /// Target mode of a mode-change request, `None` for unknown ordinals
    /// and for every other message.
    pub fn requested_mode(&self) -> Option<LockMode> {
        match *self {
            Self::ModeChange { ordinal } => LockMode::from_ordinal(ordinal),
            _ => None,
        }
    }
}
