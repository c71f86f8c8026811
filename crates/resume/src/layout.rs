//! Page geometry and the text flow cursor
//!
//! Coordinates are in points with the origin at the top-left of the page.

/// A position on the page
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box, `(x, y)` being its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Insertion point of the main text flow
///
/// Runs are placed with their top at `y`; after each run the cursor moves
/// down by the run's height and remembers its line height for `move_down`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    line_height: f64,
}

impl Cursor {
    pub fn new(origin: Point, width: f64) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width,
            line_height: 0.0,
        }
    }

    /// Move past a run of `lines` lines
    pub fn advance(&mut self, lines: usize, line_height: f64) {
        self.y += lines as f64 * line_height;
        self.line_height = line_height;
    }

    /// Move down by a (fractional) number of the last run's lines
    pub fn move_down(&mut self, lines: f64) {
        self.y += lines * self.line_height;
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }
}
