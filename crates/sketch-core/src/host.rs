//! Host collaborators.
//!
//! The core never paints, schedules, or listens on its own. A host (the
//! browser via `sketch-wasm`, or an in-memory double in tests) supplies:
//!
//! - a [`SurfaceProvider`] that mounts a [`Surface`],
//! - the surface's [`PaintContext`] and input listener hook,
//! - a [`FrameScheduler`] that runs one callback before the next repaint.

use crate::color::CssColor;
use crate::error::SketchError;
use crate::input::InputEvent;
use crate::session::SketchOptions;
use crate::shapes::Size;
use std::rc::Rc;

/// Stateful 2D paint handle bound to one surface.
///
/// Mirrors the subset of `CanvasRenderingContext2d` the drawing operations
/// use. Receivers are `&self` because host handles are shared references;
/// invalid values (bad colors, negative widths) are the host's to ignore.
pub trait PaintContext: Clone {
    /// Live pixel size of the surface behind this context.
    fn surface_size(&self) -> Size;
    /// Change the surface's pixel size. Hosts typically reset content.
    fn resize_surface(&self, size: Size);

    fn set_fill_style(&self, color: &CssColor);
    fn set_stroke_style(&self, color: &CssColor);
    fn set_line_width(&self, width: f64);
    /// CSS font shorthand, e.g. `"12px sans-serif"`.
    fn set_font(&self, font: &str);

    fn begin_path(&self);
    fn close_path(&self);
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    );
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn stroke(&self);

    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&self, text: &str, x: f64, y: f64);
}

/// A mounted drawing surface.
pub trait Surface {
    type Context: PaintContext;

    /// Obtain the surface's 2D paint context, or `None` if the host has none.
    fn context(&self) -> Option<Self::Context>;

    /// Register `listener` for pointer-down/up/move and key-down/up events.
    /// The listener stays registered for the lifetime of the surface.
    fn listen(&self, listener: Rc<dyn Fn(&InputEvent)>);
}

/// Creates and mounts surfaces.
pub trait SurfaceProvider {
    /// Opaque handle to where a surface gets mounted.
    type Root;
    type Surface: Surface;

    /// Create a surface sized to `options.surface` and mount it at
    /// `options.root` (or the host default when `None`).
    fn create_surface(
        &mut self,
        options: &SketchOptions<Self::Root>,
    ) -> Result<Self::Surface, SketchError>;
}

/// Per-frame callback scheduling (`requestAnimationFrame` on the web).
pub trait FrameScheduler {
    /// Cancellation handle for one pending request.
    type Token;

    /// Arrange for `frame` to run once before the next repaint.
    ///
    /// Must not invoke `frame` synchronously.
    fn request_frame(&mut self, frame: Box<dyn FnOnce()>) -> Result<Self::Token, SketchError>;

    /// Cancel a pending request. Cancelling a request that already fired is
    /// a no-op.
    fn cancel_frame(&mut self, token: Self::Token);
}

/// Paint context type of a provider's surfaces.
pub type ContextOf<P> = <<P as SurfaceProvider>::Surface as Surface>::Context;
