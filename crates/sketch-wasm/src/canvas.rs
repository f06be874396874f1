//! `<canvas>` surface host.
//!
//! Creates the canvas element, hands out its `CanvasRenderingContext2d`, and
//! forwards DOM pointer/keyboard events as [`InputEvent`]s.

use sketch_core::host::{PaintContext, Surface, SurfaceProvider};
use sketch_core::{CssColor, InputEvent, SketchError, SketchOptions, Size};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, HtmlElement,
    KeyboardEvent, PointerEvent,
};

use crate::describe;

/// Canvas pixel dimensions are unsigned integers.
fn to_px(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

// ─── Paint context ──────────────────────────────────────────────────────

/// A 2D context together with the canvas it paints on.
#[derive(Clone)]
pub struct CanvasContext {
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
}

impl PaintContext for CanvasContext {
    fn surface_size(&self) -> Size {
        Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn resize_surface(&self, size: Size) {
        self.canvas.set_width(to_px(size.width));
        self.canvas.set_height(to_px(size.height));
    }

    fn set_fill_style(&self, color: &CssColor) {
        self.ctx.set_fill_style_str(color.as_str());
    }

    fn set_stroke_style(&self, color: &CssColor) {
        self.ctx.set_stroke_style_str(color.as_str());
    }

    fn set_line_width(&self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_font(&self, font: &str) {
        self.ctx.set_font(font);
    }

    fn begin_path(&self) {
        self.ctx.begin_path();
    }

    fn close_path(&self) {
        self.ctx.close_path();
    }

    fn ellipse(
        &self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) {
        // Negative radii throw; the canvas contract is to skip the shape.
        let _ = self
            .ctx
            .ellipse(x, y, radius_x, radius_y, rotation, start_angle, end_angle);
    }

    fn move_to(&self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&self) {
        self.ctx.stroke();
    }

    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.stroke_rect(x, y, width, height);
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }
}

// ─── Surface ────────────────────────────────────────────────────────────

/// A mounted `<canvas>`. Owns the DOM listener closures registered on it,
/// so they live exactly as long as the surface.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    document: Document,
    listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

impl CanvasSurface {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn add_listener(&self, target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if let Err(err) =
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        {
            log::warn!("unable to listen for {kind}: {}", describe(&err));
            return;
        }
        self.listeners.borrow_mut().push(closure);
    }
}

impl Surface for CanvasSurface {
    type Context = CanvasContext;

    fn context(&self) -> Option<CanvasContext> {
        let ctx = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(CanvasContext {
            ctx,
            canvas: self.canvas.clone(),
        })
    }

    fn listen(&self, listener: Rc<dyn Fn(&InputEvent)>) {
        // Pointer events on the canvas, keys on the document: a canvas only
        // receives key events while focused.
        let canvas: &EventTarget = self.canvas.as_ref();
        let document: &EventTarget = self.document.as_ref();

        let on_down = Rc::clone(&listener);
        self.add_listener(canvas, "pointerdown", move |_| {
            on_down(&InputEvent::PointerDown)
        });

        let on_up = Rc::clone(&listener);
        self.add_listener(canvas, "pointerup", move |_| on_up(&InputEvent::PointerUp));

        let on_move = Rc::clone(&listener);
        self.add_listener(canvas, "pointermove", move |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                on_move(&InputEvent::pointer_move(
                    event.client_x() as f64,
                    event.client_y() as f64,
                ));
            }
        });

        let on_key_down = Rc::clone(&listener);
        self.add_listener(document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                on_key_down(&InputEvent::key_down(event.key()));
            }
        });

        let on_key_up = listener;
        self.add_listener(document, "keyup", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                on_key_up(&InputEvent::key_up(event.key()));
            }
        });
    }
}

// ─── Provider ───────────────────────────────────────────────────────────

/// Creates canvases in one document; mounts them on `document.body` unless
/// a root element is configured.
pub struct DomSurfaces {
    document: Document,
}

impl DomSurfaces {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl SurfaceProvider for DomSurfaces {
    type Root = HtmlElement;
    type Surface = CanvasSurface;

    fn create_surface(
        &mut self,
        options: &SketchOptions<HtmlElement>,
    ) -> Result<CanvasSurface, SketchError> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|err| SketchError::Surface(describe(&err)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SketchError::Surface("created element is not a canvas".into()))?;
        canvas.set_width(to_px(options.surface.width));
        canvas.set_height(to_px(options.surface.height));

        let root = match &options.root {
            Some(root) => root.clone(),
            None => self
                .document
                .body()
                .ok_or_else(|| SketchError::Surface("document has no body".into()))?,
        };
        root.append_child(&canvas)
            .map_err(|err| SketchError::Surface(describe(&err)))?;

        Ok(CanvasSurface {
            canvas,
            document: self.document.clone(),
            listeners: RefCell::new(Vec::new()),
        })
    }
}
