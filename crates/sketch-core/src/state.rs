//! Mutable drawing state: current style plus captured input.

use crate::color::CssColor;
use crate::input::InputEvent;
use crate::shapes::Point;
use std::collections::HashSet;

pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

/// Style and input record owned by one [`crate::Drawing`].
///
/// Style fields are overwritten by the setters; input fields are updated by
/// [`DrawingState::apply`] from host event listeners. No field depends on
/// another, so updates never need to be grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    /// Last reported pointer location.
    pub pointer: Point,
    pub pointer_down: bool,
    /// `KeyboardEvent.key` values currently held down.
    pub pressed_keys: HashSet<String>,
    pub font_size: f64,
    pub fill_color: CssColor,
    pub stroke_color: CssColor,
    pub stroke_width: f64,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            pointer: Point::ORIGIN,
            pointer_down: false,
            pressed_keys: HashSet::new(),
            font_size: DEFAULT_FONT_SIZE,
            fill_color: CssColor::WHITE,
            stroke_color: CssColor::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl DrawingState {
    /// Fold one host input event into the state.
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown => self.pointer_down = true,
            InputEvent::PointerUp => self.pointer_down = false,
            InputEvent::PointerMove { x, y } => self.pointer = Point::new(*x, *y),
            InputEvent::KeyDown { key } => {
                self.pressed_keys.insert(key.clone());
            }
            InputEvent::KeyUp { key } => {
                self.pressed_keys.remove(key);
            }
        }
    }

    /// `true` iff every key in `keys` is held. Vacuously `true` for no keys.
    pub fn is_key_pressed(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.pressed_keys.contains(*key))
    }
}
