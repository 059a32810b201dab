//! Card colour classification from raw RGBC light counts.
//!
//! The card sits a few millimetres above the sensor, so a present card
//! both raises the clear channel above ambient and skews one colour
//! channel well above the others.  Ratios are tested in a fixed order;
//! green wins ties because it is tested first.

use serde::{Deserialize, Serialize};

/// Identity class carried by a physical card.  Ordinals go on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CardColor {
    #[default]
    None = 0,
    Green = 1,
    Red = 2,
    Blue = 3,
}

impl CardColor {
    /// Cards that can own a password.
    pub const CARDS: [CardColor; 3] = [Self::Green, Self::Red, Self::Blue];

    /// Lenient decode: anything unrecognised reads as `None`.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Green,
            2 => Self::Red,
            3 => Self::Blue,
            _ => Self::None,
        }
    }

    /// Name shown on the display and in published messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Verde",
            Self::Red => "Vermelho",
            Self::Blue => "Azul",
            Self::None => "N/A",
        }
    }
}

/// One raw RGBC sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorReading {
    pub clear: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Default ambient-light gate (clear counts).
pub const DEFAULT_CLEAR_THRESHOLD: u16 = 70;

const GREEN_RATIO: f32 = 1.8;
const RED_RATIO: f32 = 2.0;
const BLUE_OVER_GREEN: f32 = 1.5;
const BLUE_OVER_RED: f32 = 2.0;

/// Map a reading to a card colour, or `CardColor::None` when no card is
/// present or the reading is ambiguous.
pub fn classify(reading: &ColorReading, clear_threshold: u16) -> CardColor {
    if reading.clear < clear_threshold {
        return CardColor::None;
    }

    let r = f32::from(reading.red);
    let g = f32::from(reading.green);
    let b = f32::from(reading.blue);

    if g > GREEN_RATIO * r && g > GREEN_RATIO * b {
        CardColor::Green
    } else if r > RED_RATIO * g && r > RED_RATIO * b {
        CardColor::Red
    } else if b > BLUE_OVER_GREEN * g && b > BLUE_OVER_RED * r {
        CardColor::Blue
    } else {
        CardColor::None
    }
}
