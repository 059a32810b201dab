//! Topic and payload composition for outbound events, plus parsing of
//! inbound remote commands.

use crate::fsm::LockMode;
use crate::link::MessageKind;
use crate::sensors::CardColor;
use crate::text::{format_truncated, push_truncated, truncated};

/// Topic and payload buffers hold at most this many characters.
pub const TEXT_CAP: usize = 99;

pub type Topic = heapless::String<TEXT_CAP>;
pub type Payload = heapless::String<TEXT_CAP>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicCategory {
    /// Current lock condition.
    Status,
    /// Audit trail.
    History,
    Heartbeat,
}

impl TopicCategory {
    pub fn for_kind(kind: MessageKind) -> Self {
        match kind {
            MessageKind::WaitingForCard
            | MessageKind::CardRead
            | MessageKind::AwaitingPassword
            | MessageKind::SystemOpen
            | MessageKind::SystemClosed
            | MessageKind::AdminMode => Self::Status,
            MessageKind::Heartbeat => Self::Heartbeat,
            _ => Self::History,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::History => "history",
            Self::Heartbeat => "heartbeat",
        }
    }
}

/// `{device_id}/{category}`
pub fn topic_for(device_id: &str, kind: MessageKind) -> Topic {
    let mut topic = Topic::new();
    push_truncated(&mut topic, device_id);
    push_truncated(&mut topic, "/");
    push_truncated(&mut topic, TopicCategory::for_kind(kind).suffix());
    topic
}

pub fn payload_for(kind: MessageKind, color: CardColor) -> Payload {
    let c = color.label();
    match kind {
        MessageKind::WaitingForCard => fixed("Aguardando cartao"),
        MessageKind::CardRead => format_truncated(format_args!("Cartao {} lido", c)),
        MessageKind::AwaitingPassword => fixed("Aguardando senha"),
        MessageKind::SystemOpen => fixed("Sistema Aberto"),
        MessageKind::SystemClosed => fixed("Sistema Fechado"),
        MessageKind::AdminMode => fixed("Modo Administracao"),
        MessageKind::AccessGranted => {
            format_truncated(format_args!("ACESSO LIBERADO: Cartao {}.", c))
        }
        MessageKind::AccessDenied => {
            format_truncated(format_args!("FALHA: Senha incorreta para o Cartao {}.", c))
        }
        MessageKind::PasswordTimeout => fixed("AVISO: Timeout para digitacao da senha."),
        MessageKind::AutoLock => fixed("EVENTO: Travamento automatico do sistema."),
        MessageKind::Cancelled => fixed("AVISO: Operacao cancelada pelo usuario."),
        MessageKind::AdminStarted => fixed("ADMIN: Modo de alteracao de senha iniciado."),
        MessageKind::PasswordChanged => {
            format_truncated(format_args!("ADMIN: Senha para Cartao {} foi alterada.", c))
        }
        MessageKind::FireAlarmOn => fixed("EMERGENCIA: Alarme de incendio ATIVADO."),
        MessageKind::FireAlarmOff => fixed("EMERGENCIA: Alarme de incendio desativado."),
        MessageKind::Heartbeat => fixed("ok"),
    }
}

fn fixed(text: &str) -> Payload {
    truncated(text)
}

/// Remote command text to a raw mode ordinal.
///
/// Accepts a decimal ordinal or the words `admin` and `fire`
/// (case-insensitive).  Out-of-table ordinals pass through so the
/// control core can apply its reset policy.
pub fn parse_mode_command(text: &str) -> Option<u16> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("admin") {
        return Some(LockMode::AdminAwaitingCard as u16);
    }
    if text.eq_ignore_ascii_case("fire") {
        return Some(LockMode::FireEmergency as u16);
    }
    text.parse::<u16>().ok()
}
