//! Typed-code buffer and the per-card password book.

use crate::config::DefaultPasswords;
use crate::sensors::CardColor;

pub const PASSWORD_LEN: usize = 4;

pub type PasswordCode = heapless::String<PASSWORD_LEN>;

/// Keys typed so far, at most [`PASSWORD_LEN`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordBuffer {
    code: PasswordCode,
}

impl PasswordBuffer {
    pub const fn new() -> Self {
        Self {
            code: PasswordCode::new(),
        }
    }

    /// Append a key.  Returns `false` (and changes nothing) when full.
    pub fn push(&mut self, key: char) -> bool {
        self.code.push(key).is_ok()
    }

    pub fn clear(&mut self) {
        self.code.clear();
    }

    pub fn len(&self) -> usize {
        self.code.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.len() == PASSWORD_LEN
    }

    pub fn as_str(&self) -> &str {
        self.code.as_str()
    }
}

/// Current code for each card.  Lives in RAM only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordBook {
    green: PasswordCode,
    red: PasswordCode,
    blue: PasswordCode,
}

impl PasswordBook {
    pub fn from_defaults(defaults: &DefaultPasswords) -> Self {
        Self {
            green: defaults.green.clone(),
            red: defaults.red.clone(),
            blue: defaults.blue.clone(),
        }
    }

    pub fn get(&self, color: CardColor) -> Option<&str> {
        match color {
            CardColor::Green => Some(self.green.as_str()),
            CardColor::Red => Some(self.red.as_str()),
            CardColor::Blue => Some(self.blue.as_str()),
            CardColor::None => None,
        }
    }

    /// Exact match of the typed code against the card's code.
    pub fn matches(&self, color: CardColor, typed: &PasswordBuffer) -> bool {
        self.get(color) == Some(typed.as_str())
    }

    /// Replace a card's code.  Only complete codes for real cards are
    /// accepted.
    pub fn set(&mut self, color: CardColor, typed: &PasswordBuffer) -> bool {
        if !typed.is_complete() {
            return false;
        }
        let slot = match color {
            CardColor::Green => &mut self.green,
            CardColor::Red => &mut self.red,
            CardColor::Blue => &mut self.blue,
            CardColor::None => return false,
        };
        slot.clone_from(&typed.code);
        true
    }
}
