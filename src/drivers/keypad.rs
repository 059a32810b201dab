//! Press detection on top of a raw keypad scan.
//!
//! The scanner reports whatever key is down on every poll.  The
//! debouncer turns that level signal into press events: a key is emitted
//! once when it first appears and again only after the pad has been seen
//! released (or a different key appears).
//!
//! ```text
//!  raw:     None  '1'  '1'  '1'  None  '1'  '2'
//!  pressed:  -    '1'   -    -    -    '1'  '2'
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyDebouncer {
    held: Option<char>,
    suppress_held: bool,
}

impl KeyDebouncer {
    /// With `suppress_held == false` every raw read passes through.
    pub const fn new(suppress_held: bool) -> Self {
        Self {
            held: None,
            suppress_held,
        }
    }

    pub fn filter(&mut self, raw: Option<char>) -> Option<char> {
        if !self.suppress_held {
            return raw;
        }
        let previous = self.held;
        self.held = raw;
        match raw {
            Some(key) if previous != Some(key) => Some(key),
            _ => None,
        }
    }
}
