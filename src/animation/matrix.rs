//! 5×5 LED matrix frame buffer and glyphs.
//!
//! Pixels are addressed by `(x, y)` with the origin top-left.  The
//! physical WS2812 strip snakes through the panel, so the driver walks
//! [`MatrixFrame::strip_order`] rather than the logical grid.
//!
//! ```text
//!  y=0   0 → 1 → 2 → 3 → 4
//!  y=1   9 ← 8 ← 7 ← 6 ← 5
//!  y=2  10 → …
//! ```

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const WIDTH: usize = 5;
pub const HEIGHT: usize = 5;
pub const PIXELS: usize = WIDTH * HEIGHT;

pub const OFF: Rgb = (0, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixFrame {
    /// Row-major, `rows[y][x]`.
    rows: [[Rgb; WIDTH]; HEIGHT],
}

impl Default for MatrixFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixFrame {
    pub const fn new() -> Self {
        Self {
            rows: [[OFF; WIDTH]; HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.rows = [[OFF; WIDTH]; HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, colour: Rgb) {
        self.rows[y][x] = colour;
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(|&p| p == OFF)
    }

    pub fn lit_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&p| p != OFF).count()
    }

    /// Position of `(x, y)` along the serpentine strip.
    pub const fn strip_index(x: usize, y: usize) -> usize {
        if y % 2 == 0 {
            y * WIDTH + x
        } else {
            y * WIDTH + (WIDTH - 1 - x)
        }
    }

    /// Pixels in the order they are clocked out to the strip.
    pub fn strip_order(&self) -> [Rgb; PIXELS] {
        let mut out = [OFF; PIXELS];
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &p) in row.iter().enumerate() {
                out[Self::strip_index(x, y)] = p;
            }
        }
        out
    }
}

// ── Glyphs ────────────────────────────────────────────────────
//
// Every glyph starts from a blank frame.

pub const CROSS_RED: Rgb = (150, 0, 0);
pub const WARN_AMBER: Rgb = (150, 75, 0);
pub const OK_GREEN: Rgb = (0, 150, 0);

pub fn draw_cross(frame: &mut MatrixFrame) {
    frame.clear();
    for i in 0..WIDTH {
        frame.set(i, i, CROSS_RED);
        frame.set(WIDTH - 1 - i, i, CROSS_RED);
    }
}

/// Square ring without its corners.
pub fn draw_ring(frame: &mut MatrixFrame, colour: Rgb) {
    frame.clear();
    for x in 1..=3 {
        frame.set(x, 0, colour);
        frame.set(x, 4, colour);
    }
    for y in 1..=3 {
        frame.set(0, y, colour);
        frame.set(4, y, colour);
    }
}

pub fn draw_exclamation(frame: &mut MatrixFrame) {
    frame.clear();
    for y in [0, 1, 2, 4] {
        frame.set(2, y, WARN_AMBER);
    }
}

pub fn draw_center_dot(frame: &mut MatrixFrame, colour: Rgb) {
    frame.clear();
    frame.set(2, 2, colour);
}

pub fn draw_plus(frame: &mut MatrixFrame, colour: Rgb) {
    frame.clear();
    for (x, y) in [(2, 1), (1, 2), (2, 2), (3, 2), (2, 3)] {
        frame.set(x, y, colour);
    }
}

/// One lit cell per entered digit along the middle row, at most four.
pub fn draw_digit_bar(frame: &mut MatrixFrame, digits: usize) {
    frame.clear();
    for i in 0..digits.min(4) {
        frame.set(i + 1, 2, WARN_AMBER);
    }
}
