//! Unified error types for the lock firmware.
//!
//! A single `Error` enum that every subsystem converts into, so boot code
//! and the binary entry point handle failures uniformly.  All variants are
//! `Copy` so they pass through the control loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The colour sensor could not be identified, configured or read.
    Sensor(SensorError),
    /// The uplink (wireless link or pub/sub session) failed.
    Comms(CommsError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Configuration writes were rejected during power-up.
    InitFailed,
    /// The ID register returned something other than a TCS3472x part.
    UnexpectedId(u8),
    /// An I2C transaction failed.
    BusFault,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "colour sensor init failed"),
            Self::UnexpectedId(id) => write!(f, "unexpected colour sensor id 0x{id:02X}"),
            Self::BusFault => write!(f, "I2C bus fault"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The network thread reported that association failed.
    LinkFailed,
    /// No link report arrived in time.
    LinkTimeout,
    /// The pub/sub client has no session.
    NotConnected,
    /// The pub/sub client rejected a publish.
    PublishFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkFailed => write!(f, "wireless link failed"),
            Self::LinkTimeout => write!(f, "wireless link timed out"),
            Self::NotConnected => write!(f, "broker session not connected"),
            Self::PublishFailed => write!(f, "publish failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Channel protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Upper half-word is not a known command code.
    UnknownCommand(u16),
    /// Publish request names a message kind outside the table.
    UnknownMessageKind(u8),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(code) => write!(f, "unknown command 0x{code:04X}"),
            Self::UnknownMessageKind(kind) => write!(f, "unknown message kind {kind}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
