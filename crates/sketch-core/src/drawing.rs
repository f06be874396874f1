//! The drawing interface handed to frame callbacks.
//!
//! Every drawing operation translates 1:1 into calls on the host
//! [`PaintContext`], parameterized by the current [`DrawingState`].

use crate::color::CssColor;
use crate::host::{PaintContext, Surface};
use crate::input::InputEvent;
use crate::shapes::{Circle, Line, Point, Rect, Size, Text};
use crate::state::DrawingState;
use std::cell::{Ref, RefCell};
use std::f64::consts::{FRAC_PI_4, TAU};
use std::rc::Rc;

/// Font family used for every `draw_text` call.
pub const FONT_FAMILY: &str = "sans-serif";

/// Imperative drawing API over one paint context.
///
/// Created once per session and shared by every callback on every frame.
/// Clones are handles to the same context and state.
pub struct Drawing<C: PaintContext> {
    ctx: C,
    state: Rc<RefCell<DrawingState>>,
}

impl<C: PaintContext> Clone for Drawing<C> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            state: Rc::clone(&self.state),
        }
    }
}

impl<C: PaintContext> Drawing<C> {
    /// Wrap `ctx` and start tracking input delivered by `surface`.
    pub fn new<S>(ctx: C, surface: &S) -> Self
    where
        S: Surface<Context = C>,
    {
        let state = Rc::new(RefCell::new(DrawingState::default()));
        let listener_state = Rc::clone(&state);
        surface.listen(Rc::new(move |event: &InputEvent| {
            listener_state.borrow_mut().apply(event);
        }));
        Self { ctx, state }
    }

    /// The underlying paint context.
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Read-only view of the current style and input state.
    pub fn state(&self) -> Ref<'_, DrawingState> {
        self.state.borrow()
    }

    // ─── Queries ────────────────────────────────────────────────────────

    /// Live surface size (not the configured one).
    pub fn surface_size(&self) -> Size {
        self.ctx.surface_size()
    }

    pub fn is_pointer_down(&self) -> bool {
        self.state.borrow().pointer_down
    }

    pub fn pointer_position(&self) -> Point {
        self.state.borrow().pointer
    }

    /// `true` iff all `keys` are currently held; `true` for an empty slice.
    pub fn is_key_pressed(&self, keys: &[&str]) -> bool {
        self.state.borrow().is_key_pressed(keys)
    }

    // ─── Style setters ──────────────────────────────────────────────────

    pub fn set_font_size(&self, size: f64) {
        self.state.borrow_mut().font_size = size;
    }

    pub fn set_fill_color(&self, color: impl Into<CssColor>) {
        let color = color.into();
        log::trace!("fill color {color} ({:?})", color.form());
        self.state.borrow_mut().fill_color = color;
    }

    pub fn set_stroke_color(&self, color: impl Into<CssColor>) {
        let color = color.into();
        log::trace!("stroke color {color} ({:?})", color.form());
        self.state.borrow_mut().stroke_color = color;
    }

    pub fn set_stroke_width(&self, width: f64) {
        self.state.borrow_mut().stroke_width = width;
    }

    // ─── Drawing operations ─────────────────────────────────────────────

    /// Stroke a circle outline centered at `shape.location`.
    pub fn draw_circle(&self, shape: Circle) {
        let state = self.state.borrow();
        let Point { x, y } = shape.location;
        self.ctx.begin_path();
        // Rotation has no visible effect on a full circular sweep.
        self.ctx
            .ellipse(x, y, shape.radius, shape.radius, FRAC_PI_4, 0.0, TAU);
        self.ctx.set_stroke_style(&state.stroke_color);
        self.ctx.set_line_width(state.stroke_width);
        self.ctx.stroke();
        self.ctx.close_path();
    }

    /// Stroke a rectangle outline. The fill style is set from the current
    /// fill color even though nothing is filled.
    pub fn draw_rect(&self, shape: Rect) {
        let state = self.state.borrow();
        self.ctx.set_fill_style(&state.fill_color);
        self.ctx.set_line_width(state.stroke_width);
        self.ctx.set_stroke_style(&state.stroke_color);
        self.ctx.stroke_rect(
            shape.location.x,
            shape.location.y,
            shape.size.width,
            shape.size.height,
        );
    }

    /// Erase the whole surface.
    pub fn clear(&self) {
        let Size { width, height } = self.ctx.surface_size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    /// Clear, then paint the whole surface with `color`. One-shot: the stored
    /// fill color is left alone.
    pub fn fill(&self, color: impl Into<CssColor>) {
        self.clear();
        let Size { width, height } = self.ctx.surface_size();
        self.ctx.set_fill_style(&color.into());
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    pub fn draw_line(&self, line: Line) {
        let state = self.state.borrow();
        self.ctx.set_stroke_style(&state.stroke_color);
        self.ctx.set_line_width(state.stroke_width);
        self.ctx.begin_path();
        self.ctx.move_to(line.from.x, line.from.y);
        self.ctx.line_to(line.to.x, line.to.y);
        self.ctx.stroke();
        self.ctx.close_path();
    }

    pub fn draw_text(&self, text: &Text) {
        let state = self.state.borrow();
        self.ctx
            .set_font(&format!("{}px {FONT_FAMILY}", state.font_size));
        self.ctx.set_fill_style(&state.fill_color);
        self.ctx
            .fill_text(&text.text, text.location.x, text.location.y);
    }

    /// Resize the live surface. Existing content is not preserved.
    pub fn resize(&self, size: Size) {
        log::debug!("resize surface to {}x{}", size.width, size.height);
        self.ctx.resize_surface(size);
    }
}
