//! Lock configuration parameters.
//!
//! All tunable parameters for the lock and its uplink.  The defaults are
//! the factory values; the host bench can override them from a JSON file.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsm::credentials::{PASSWORD_LEN, PasswordCode};
use crate::sensors::CardColor;
use crate::sensors::color::DEFAULT_CLEAR_THRESHOLD;
use crate::text::{is_printable_ascii, truncated};

/// Device identifier used as the topic prefix.
pub type DeviceId = heapless::String<32>;

/// Factory code per card colour.  Not persisted; changes made in admin
/// mode last until power-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPasswords {
    pub green: PasswordCode,
    pub red: PasswordCode,
    pub blue: PasswordCode,
}

impl DefaultPasswords {
    pub fn for_color(&self, color: CardColor) -> Option<&PasswordCode> {
        match color {
            CardColor::Green => Some(&self.green),
            CardColor::Red => Some(&self.red),
            CardColor::Blue => Some(&self.blue),
            CardColor::None => None,
        }
    }
}

impl Default for DefaultPasswords {
    fn default() -> Self {
        Self {
            green: truncated("1337"),
            red: truncated("8008"),
            blue: truncated("4242"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    // --- Identity ---
    /// Topic prefix, `{device_id}/status` etc.
    pub device_id: DeviceId,

    // --- Authentication ---
    /// Time allowed to type a code after a card is read (seconds)
    pub password_timeout_secs: u32,
    pub default_passwords: DefaultPasswords,
    /// Report a held key once instead of on every scan
    pub suppress_held_keys: bool,
    /// Clear-channel counts below which no card is assumed present
    pub clear_threshold: u16,

    // --- Latch ---
    /// Open time before automatic re-lock (seconds)
    pub auto_lock_secs: u32,
    /// Time the servo is driven before its pulse is released (ms)
    pub servo_move_ms: u32,
    pub servo_open_angle: u8,
    pub servo_closed_angle: u8,

    // --- User interface ---
    pub display_refresh_ms: u32,
    /// How long result screens stay up before returning to idle (ms)
    pub message_display_ms: u32,
    pub alarm_first_beep_ms: u32,
    pub alarm_period_ms: u32,

    // --- Uplink ---
    pub heartbeat_secs: u32,
    /// Minimum gap between consecutive publishes (ms)
    pub publish_min_interval_ms: u32,
    /// Association timeout on the network core (ms)
    pub link_connect_timeout_ms: u32,
    /// How long the control core waits for the link report at boot (ms)
    pub link_wait_timeout_ms: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            device_id: truncated("bitdoglab_02"),

            password_timeout_secs: 15,
            default_passwords: DefaultPasswords::default(),
            suppress_held_keys: true,
            clear_threshold: DEFAULT_CLEAR_THRESHOLD,

            auto_lock_secs: 20,
            servo_move_ms: 500,
            servo_open_angle: 150,
            servo_closed_angle: 0,

            display_refresh_ms: 1000,
            message_display_ms: 4000,
            alarm_first_beep_ms: 500,
            alarm_period_ms: 1000,

            heartbeat_secs: 30,
            publish_min_interval_ms: 50,
            link_connect_timeout_ms: 30_000,
            link_wait_timeout_ms: 35_000,
        }
    }
}

impl LockConfig {
    pub fn validate(&self) -> Result<()> {
        if self.device_id.is_empty() || !is_printable_ascii(&self.device_id) {
            return Err(Error::Config("device_id must be non-empty printable ASCII"));
        }
        if self.device_id.contains(['/', '#', '+']) {
            return Err(Error::Config("device_id must not contain topic separators"));
        }
        for color in CardColor::CARDS {
            let Some(code) = self.default_passwords.for_color(color) else {
                continue;
            };
            if code.len() != PASSWORD_LEN || code.contains(['#', '*']) {
                return Err(Error::Config("passwords must be 4 keys, without # or *"));
            }
        }
        if self.password_timeout_secs == 0 || self.auto_lock_secs == 0 {
            return Err(Error::Config("lock timeouts must be non-zero"));
        }
        if self.servo_open_angle > 180 || self.servo_closed_angle > 180 {
            return Err(Error::Config("servo angles must be within 0..=180"));
        }
        if self.heartbeat_secs == 0 || self.alarm_period_ms == 0 || self.display_refresh_ms == 0 {
            return Err(Error::Config("periodic intervals must be non-zero"));
        }
        if self.link_wait_timeout_ms < self.link_connect_timeout_ms {
            return Err(Error::Config("link wait must cover the connect timeout"));
        }
        Ok(())
    }

    pub fn password_timeout(&self) -> Duration {
        Duration::from_secs(self.password_timeout_secs.into())
    }

    pub fn auto_lock(&self) -> Duration {
        Duration::from_secs(self.auto_lock_secs.into())
    }

    pub fn servo_move(&self) -> Duration {
        Duration::from_millis(self.servo_move_ms.into())
    }

    pub fn display_refresh(&self) -> Duration {
        Duration::from_millis(self.display_refresh_ms.into())
    }

    pub fn message_display(&self) -> Duration {
        Duration::from_millis(self.message_display_ms.into())
    }

    pub fn alarm_first_beep(&self) -> Duration {
        Duration::from_millis(self.alarm_first_beep_ms.into())
    }

    pub fn alarm_period(&self) -> Duration {
        Duration::from_millis(self.alarm_period_ms.into())
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs.into())
    }

    pub fn publish_min_interval(&self) -> Duration {
        Duration::from_millis(self.publish_min_interval_ms.into())
    }

    pub fn link_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.link_connect_timeout_ms.into())
    }

    pub fn link_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.link_wait_timeout_ms.into())
    }
}
