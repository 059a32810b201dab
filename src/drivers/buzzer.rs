//! Audible feedback patterns.
//!
//! All of these block the calling core for the length of the pattern;
//! the control loop accepts that stall in exchange for simple, glitch-free
//! audio.

use crate::app::ports::BuzzerPort;

/// (frequency Hz, duration ms); frequency 0 is a rest.
pub type Note = (u32, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Melody {
    /// Rising C-major arpeggio.
    Success,
    /// Falling two-tone buzz.
    Error,
}

const SUCCESS_NOTES: [Note; 4] = [(523, 100), (659, 100), (784, 100), (1047, 200)];
const ERROR_NOTES: [Note; 3] = [(400, 150), (0, 50), (300, 300)];

impl Melody {
    pub fn notes(self) -> &'static [Note] {
        match self {
            Self::Success => &SUCCESS_NOTES,
            Self::Error => &ERROR_NOTES,
        }
    }
}

pub const KEY_CLICK: Note = (1500, 50);
pub const ALARM_BEEP: Note = (3000, 100);
const TIMEOUT_BEEP: Note = (880, 100);
const TIMEOUT_GAP_MS: u32 = 50;
const TIMEOUT_BEEPS: usize = 3;

pub fn key_click<B: BuzzerPort + ?Sized>(buzzer: &mut B) {
    buzzer.play_tone(KEY_CLICK.0, KEY_CLICK.1);
}

pub fn alarm_beep<B: BuzzerPort + ?Sized>(buzzer: &mut B) {
    buzzer.play_tone(ALARM_BEEP.0, ALARM_BEEP.1);
}

/// Three short beeps separated by rests.
pub fn timeout_beeps<B: BuzzerPort + ?Sized>(buzzer: &mut B) {
    for i in 0..TIMEOUT_BEEPS {
        if i > 0 {
            buzzer.play_tone(0, TIMEOUT_GAP_MS);
        }
        buzzer.play_tone(TIMEOUT_BEEP.0, TIMEOUT_BEEP.1);
    }
}
