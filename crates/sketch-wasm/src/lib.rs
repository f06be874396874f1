//! WASM bridge for sketch — exposes the frame loop and drawing API to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`.
//!
//! ```js
//! const sketch = new Sketch();
//! sketch.init(null, '{"canvas":{"width":400,"height":300}}');
//! sketch.loop((ops) => {
//!   ops.fill("rgba(100, 100, 100, 0.5)");
//!   ops.draw_circle(200, 150, 20);
//! });
//! ```

mod canvas;
mod console;
mod demo;
mod frames;
mod options;

pub use canvas::{CanvasContext, CanvasSurface, DomSurfaces};
pub use demo::demo;
pub use frames::{AnimationFrames, FrameToken};

use sketch_core::{Circle, CssColor, Drawing, Line, Point, Rect, Session, SketchError, Size, Text};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

type WebSession = Session<DomSurfaces, AnimationFrames>;

/// A sketch bound to one `<canvas>` in the current document.
#[wasm_bindgen]
pub struct Sketch {
    session: WebSession,
}

#[wasm_bindgen]
impl Sketch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Sketch, JsValue> {
        // Set up panic hook for better error messages in console
        console_error_panic_hook_setup();
        console::install(log::LevelFilter::Warn);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            session: Session::new(DomSurfaces::new(document), AnimationFrames::new(window)),
        })
    }

    /// Configure the sketch before its canvas exists.
    ///
    /// `options` is JSON, e.g. `{"canvas":{"width":400,"height":300}}`, or an
    /// empty string. Returns `false` (and warns) once the canvas is created.
    pub fn init(&self, root: Option<HtmlElement>, options: &str) -> Result<bool, JsValue> {
        let mut patch = options::parse_options(options).map_err(|e| JsValue::from_str(&e))?;
        if let Some(root) = root {
            patch = patch.root(root);
        }
        Ok(self.session.configure(patch))
    }

    /// Register a per-frame callback `(ops: Ops) => void` and start the loop.
    #[wasm_bindgen(js_name = "loop")]
    pub fn register(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        let mut ops: Option<JsValue> = None;
        self.session
            .register(move |drawing| {
                let ops = ops.get_or_insert_with(|| {
                    JsValue::from(Ops {
                        drawing: drawing.clone(),
                    })
                });
                // A throwing callback must not stop the animation.
                if let Err(err) = callback.call1(&JsValue::NULL, ops) {
                    log::error!("sketch callback threw: {}", describe(&err));
                }
            })
            .map_err(to_js)
    }

    pub fn cancel_loop(&self) {
        self.session.cancel_loop();
    }

    pub fn reset(&self) {
        self.session.reset();
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// The canvas, creating it if needed.
    pub fn canvas(&self) -> Result<web_sys::HtmlCanvasElement, JsValue> {
        Ok(self.session.surface().map_err(to_js)?.canvas().clone())
    }

    /// `"off"`, `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`.
    /// Returns `false` for an unknown level.
    pub fn set_log_level(&self, level: &str) -> bool {
        match level.parse::<log::LevelFilter>() {
            Ok(level) => {
                log::set_max_level(level);
                true
            }
            Err(_) => false,
        }
    }
}

/// Drawing operations handed to frame callbacks.
#[wasm_bindgen]
pub struct Ops {
    drawing: Drawing<CanvasContext>,
}

#[wasm_bindgen]
impl Ops {
    // ─── Queries ────────────────────────────────────────────────────────

    pub fn width(&self) -> f64 {
        self.drawing.surface_size().width
    }

    pub fn height(&self) -> f64 {
        self.drawing.surface_size().height
    }

    pub fn is_pointer_down(&self) -> bool {
        self.drawing.is_pointer_down()
    }

    pub fn pointer_x(&self) -> f64 {
        self.drawing.pointer_position().x
    }

    pub fn pointer_y(&self) -> f64 {
        self.drawing.pointer_position().y
    }

    /// `true` iff every key in `keys` is held (`KeyboardEvent.key` values).
    pub fn is_key_pressed(&self, keys: Vec<String>) -> bool {
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.drawing.is_key_pressed(&keys)
    }

    // ─── Style ──────────────────────────────────────────────────────────

    pub fn set_font_size(&self, size: f64) {
        self.drawing.set_font_size(size);
    }

    pub fn set_fill_color(&self, color: &str) {
        self.drawing.set_fill_color(CssColor::new(color));
    }

    pub fn set_stroke_color(&self, color: &str) {
        self.drawing.set_stroke_color(CssColor::new(color));
    }

    pub fn set_stroke_width(&self, width: f64) {
        self.drawing.set_stroke_width(width);
    }

    // ─── Drawing ────────────────────────────────────────────────────────

    pub fn draw_circle(&self, x: f64, y: f64, radius: f64) {
        self.drawing.draw_circle(Circle::new(x, y, radius));
    }

    pub fn draw_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.drawing.draw_rect(Rect::new(x, y, width, height));
    }

    pub fn draw_line(&self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.drawing
            .draw_line(Line::new(Point::new(x1, y1), Point::new(x2, y2)));
    }

    pub fn draw_text(&self, text: &str, x: f64, y: f64) {
        self.drawing.draw_text(&Text::new(x, y, text));
    }

    pub fn clear(&self) {
        self.drawing.clear();
    }

    pub fn fill(&self, color: &str) {
        self.drawing.fill(CssColor::new(color));
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.drawing.resize(Size::new(width, height));
    }
}

pub(crate) fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn to_js(err: SketchError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sketch WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
