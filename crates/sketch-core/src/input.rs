//! Input abstraction layer.
//!
//! Normalizes host pointer and keyboard events into a unified `InputEvent`
//! that the drawing state consumes.

/// A normalized input event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown,

    /// Pointer released.
    PointerUp,

    /// Pointer moved to a new position.
    PointerMove { x: f64, y: f64 },

    /// A key went down. `key` is the `KeyboardEvent.key` value
    /// (e.g. `"ArrowUp"`, `"a"`, `" "`).
    KeyDown { key: String },

    /// A key was released.
    KeyUp { key: String },
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        Self::KeyUp { key: key.into() }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    /// Extract position if this event carries one.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerMove { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}
