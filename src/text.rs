//! Fixed-capacity text helpers.

use core::fmt::{self, Write};

use heapless::String;

/// Returns `true` if every byte of `s` is printable ASCII (`0x20..=0x7E`).
pub fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Append as much of `s` as fits, stopping at a char boundary.
pub fn push_truncated<const N: usize>(out: &mut String<N>, s: &str) {
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
}

pub fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    push_truncated(&mut out, s);
    out
}

/// `fmt::Write` sink that silently drops whatever does not fit.
pub struct Truncating<'a, const N: usize>(pub &'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        push_truncated(self.0, s);
        Ok(())
    }
}

/// Format into a bounded string, truncating on overflow.
pub fn format_truncated<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut out = String::new();
    // Truncating::write_str never fails.
    let _ = Truncating(&mut out).write_fmt(args);
    out
}
