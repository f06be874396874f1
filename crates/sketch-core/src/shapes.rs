//! Shape value types consumed by the drawing operations.
//!
//! All coordinates are in surface pixels with the origin at the top-left.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Surface size used when nothing was configured.
    pub const DEFAULT: Size = Size {
        width: 200.0,
        height: 200.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An axis-aligned box. `location` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub location: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            location: Point::new(x, y),
            size: Size::new(width, height),
        }
    }
}

/// A circle. `location` is the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub location: Point,
    pub radius: f64,
}

impl Circle {
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            location: Point::new(x, y),
            radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// A run of text anchored at `location` (alphabetic baseline, left aligned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub location: Point,
    pub text: String,
}

impl Text {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            location: Point::new(x, y),
            text: text.into(),
        }
    }
}
