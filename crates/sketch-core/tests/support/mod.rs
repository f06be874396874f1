//! In-memory host for integration tests: a paint context that records calls,
//! a surface that can emit input events, and a frame scheduler driven by hand.

#![allow(dead_code)]

use sketch_core::host::{FrameScheduler, PaintContext, Surface, SurfaceProvider};
use sketch_core::{CssColor, InputEvent, Session, SketchError, SketchOptions, Size};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type TestSession = Session<FakeProvider, ManualScheduler>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Session over a fresh fake host, plus handles to inspect it.
pub fn make_session() -> (TestSession, ManualScheduler, Rc<Cell<usize>>) {
    init_logger();
    let provider = FakeProvider::new();
    let created = Rc::clone(&provider.created);
    let scheduler = ManualScheduler::default();
    let session = Session::new(provider, scheduler.clone());
    (session, scheduler, created)
}

// ─── Paint context ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    Font(String),
    BeginPath,
    ClosePath,
    Ellipse {
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
    },
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    StrokeRect(f64, f64, f64, f64),
    FillRect(f64, f64, f64, f64),
    ClearRect(f64, f64, f64, f64),
    FillText(String, f64, f64),
    Resize(f64, f64),
}

#[derive(Clone)]
pub struct RecordingContext {
    calls: Rc<RefCell<Vec<Call>>>,
    size: Rc<Cell<Size>>,
}

impl RecordingContext {
    pub fn new(size: Size) -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            size: Rc::new(Cell::new(size)),
        }
    }

    /// Drain the recorded calls.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl PaintContext for RecordingContext {
    fn surface_size(&self) -> Size {
        self.size.get()
    }

    fn resize_surface(&self, size: Size) {
        self.size.set(size);
        self.record(Call::Resize(size.width, size.height));
    }

    fn set_fill_style(&self, color: &CssColor) {
        self.record(Call::FillStyle(color.to_string()));
    }

    fn set_stroke_style(&self, color: &CssColor) {
        self.record(Call::StrokeStyle(color.to_string()));
    }

    fn set_line_width(&self, width: f64) {
        self.record(Call::LineWidth(width));
    }

    fn set_font(&self, font: &str) {
        self.record(Call::Font(font.to_string()));
    }

    fn begin_path(&self) {
        self.record(Call::BeginPath);
    }

    fn close_path(&self) {
        self.record(Call::ClosePath);
    }

    fn ellipse(
        &self,
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
    ) {
        self.record(Call::Ellipse {
            x,
            y,
            rx,
            ry,
            rotation,
            start,
            end,
        });
    }

    fn move_to(&self, x: f64, y: f64) {
        self.record(Call::MoveTo(x, y));
    }

    fn line_to(&self, x: f64, y: f64) {
        self.record(Call::LineTo(x, y));
    }

    fn stroke(&self) {
        self.record(Call::Stroke);
    }

    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        self.record(Call::StrokeRect(x, y, w, h));
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        self.record(Call::FillRect(x, y, w, h));
    }

    fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        self.record(Call::ClearRect(x, y, w, h));
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) {
        self.record(Call::FillText(text.to_string(), x, y));
    }
}

// ─── Surface ────────────────────────────────────────────────────────────

pub struct FakeSurface {
    pub root: Option<String>,
    pub initial_size: Size,
    ctx: Option<RecordingContext>,
    listeners: RefCell<Vec<Rc<dyn Fn(&InputEvent)>>>,
}

impl FakeSurface {
    /// Deliver an input event to every registered listener.
    pub fn emit(&self, event: InputEvent) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Surface for FakeSurface {
    type Context = RecordingContext;

    fn context(&self) -> Option<RecordingContext> {
        self.ctx.clone()
    }

    fn listen(&self, listener: Rc<dyn Fn(&InputEvent)>) {
        self.listeners.borrow_mut().push(listener);
    }
}

pub struct FakeProvider {
    pub created: Rc<Cell<usize>>,
    /// When `false`, surfaces yield no paint context.
    pub with_context: bool,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            created: Rc::new(Cell::new(0)),
            with_context: true,
        }
    }

    pub fn without_context() -> Self {
        Self {
            with_context: false,
            ..Self::new()
        }
    }
}

impl SurfaceProvider for FakeProvider {
    type Root = String;
    type Surface = FakeSurface;

    fn create_surface(&mut self, options: &SketchOptions<String>) -> Result<FakeSurface, SketchError> {
        self.created.set(self.created.get() + 1);
        Ok(FakeSurface {
            root: options.root.clone(),
            initial_size: options.surface,
            ctx: self
                .with_context
                .then(|| RecordingContext::new(options.surface)),
            listeners: RefCell::new(Vec::new()),
        })
    }
}

// ─── Scheduler ──────────────────────────────────────────────────────────

type PendingFrame = (u64, Box<dyn FnOnce()>);

/// Frame scheduler the test advances explicitly with [`ManualScheduler::tick`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Vec<PendingFrame>>>,
    next_id: Rc<Cell<u64>>,
    /// Behave like a host whose cancellation arrives too late.
    pub ignore_cancel: Rc<Cell<bool>>,
    /// Refuse every request.
    pub reject: Rc<Cell<bool>>,
}

impl ManualScheduler {
    /// Fire every frame pending right now. Frames requested while firing wait
    /// for the next tick. Returns how many fired.
    pub fn tick(&self) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let fired = due.len();
        for (_, frame) in due {
            frame();
        }
        fired
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualScheduler {
    type Token = u64;

    fn request_frame(&mut self, frame: Box<dyn FnOnce()>) -> Result<u64, SketchError> {
        if self.reject.get() {
            return Err(SketchError::Scheduler("rejected by test host".into()));
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.queue.borrow_mut().push((id, frame));
        Ok(id)
    }

    fn cancel_frame(&mut self, token: u64) {
        if self.ignore_cancel.get() {
            return;
        }
        self.queue.borrow_mut().retain(|(id, _)| *id != token);
    }
}
