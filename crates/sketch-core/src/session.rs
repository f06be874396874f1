//! Surface session: one lazily-created surface plus its frame loop.
//!
//! The surface, its paint context, and the [`Drawing`] are created on first
//! use and kept for the session's lifetime. Registered callbacks run once per
//! frame, in registration order, each receiving the same `Drawing`.
//!
//! The loop is an explicit state machine. `Inactive` becomes `Active` on the
//! first registration; every tick re-arms the next one through the
//! [`FrameScheduler`] unless the loop was cancelled while callbacks ran.
//! Each activation gets a fresh epoch so a tick from a cancelled loop that the
//! host still delivers is ignored.

use crate::drawing::Drawing;
use crate::error::SketchError;
use crate::host::{ContextOf, FrameScheduler, Surface, SurfaceProvider};
use crate::shapes::Size;
use std::cell::{Cell, OnceCell, Ref, RefCell};
use std::rc::Rc;

/// Where and how big the surface is created.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchOptions<R> {
    /// Mount point; `None` lets the host pick (the document body on the web).
    pub root: Option<R>,
    /// Initial surface size.
    pub surface: Size,
}

impl<R> Default for SketchOptions<R> {
    fn default() -> Self {
        Self {
            root: None,
            surface: Size::DEFAULT,
        }
    }
}

impl<R> SketchOptions<R> {
    fn merge(&mut self, patch: OptionsPatch<R>) {
        if let Some(root) = patch.root {
            self.root = Some(root);
        }
        if let Some(size) = patch.surface {
            self.surface = size;
        }
    }
}

/// Partial options; unset fields keep their current value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsPatch<R> {
    pub root: Option<R>,
    pub surface: Option<Size>,
}

impl<R> Default for OptionsPatch<R> {
    fn default() -> Self {
        Self {
            root: None,
            surface: None,
        }
    }
}

impl<R> OptionsPatch<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: R) -> Self {
        self.root = Some(root);
        self
    }

    pub fn surface(mut self, size: Size) -> Self {
        self.surface = Some(size);
        self
    }
}

type FrameCallback<C> = Rc<RefCell<dyn FnMut(&Drawing<C>)>>;

struct ActiveLoop<T> {
    epoch: u64,
    token: T,
}

struct Inner<P: SurfaceProvider, S: FrameScheduler> {
    provider: RefCell<P>,
    scheduler: RefCell<S>,
    options: RefCell<SketchOptions<P::Root>>,
    surface: OnceCell<P::Surface>,
    context: OnceCell<ContextOf<P>>,
    drawing: OnceCell<Rc<Drawing<ContextOf<P>>>>,
    callbacks: RefCell<Vec<FrameCallback<ContextOf<P>>>>,
    active: RefCell<Option<ActiveLoop<S::Token>>>,
    next_epoch: Cell<u64>,
}

impl<P: SurfaceProvider, S: FrameScheduler> Drop for Inner<P, S> {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().take() {
            self.scheduler.get_mut().cancel_frame(active.token);
        }
    }
}

/// Owns one drawing surface and drives its frame loop.
///
/// Cloning is cheap and yields a handle to the same session, which is how
/// frame callbacks reach back to cancel or register.
pub struct Session<P: SurfaceProvider, S: FrameScheduler> {
    inner: Rc<Inner<P, S>>,
}

impl<P: SurfaceProvider, S: FrameScheduler> Clone for Session<P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P, S> Session<P, S>
where
    P: SurfaceProvider + 'static,
    S: FrameScheduler + 'static,
{
    pub fn new(provider: P, scheduler: S) -> Self {
        Self {
            inner: Rc::new(Inner {
                provider: RefCell::new(provider),
                scheduler: RefCell::new(scheduler),
                options: RefCell::new(SketchOptions::default()),
                surface: OnceCell::new(),
                context: OnceCell::new(),
                drawing: OnceCell::new(),
                callbacks: RefCell::new(Vec::new()),
                active: RefCell::new(None),
                next_epoch: Cell::new(0),
            }),
        }
    }

    // ─── Configuration ──────────────────────────────────────────────────

    /// Merge `patch` into the options. Only effective before the surface
    /// exists; afterwards the call is logged and ignored (returns `false`).
    pub fn configure(&self, patch: OptionsPatch<P::Root>) -> bool {
        if self.inner.surface.get().is_some() {
            log::warn!("surface is already initialized, change state via frame callbacks");
            return false;
        }
        self.inner.options.borrow_mut().merge(patch);
        true
    }

    pub fn options(&self) -> Ref<'_, SketchOptions<P::Root>> {
        self.inner.options.borrow()
    }

    // ─── Frame loop ─────────────────────────────────────────────────────

    /// Append `callback` and make sure the loop is running.
    pub fn register<F>(&self, callback: F) -> Result<(), SketchError>
    where
        F: FnMut(&Drawing<ContextOf<P>>) + 'static,
    {
        let callback: FrameCallback<ContextOf<P>> = Rc::new(RefCell::new(callback));
        self.inner.callbacks.borrow_mut().push(callback);
        self.start_loop()
    }

    /// Stop the loop if it is running. Callbacks stay registered.
    pub fn cancel_loop(&self) {
        let active = self.inner.active.borrow_mut().take();
        if let Some(active) = active {
            self.inner.scheduler.borrow_mut().cancel_frame(active.token);
            log::debug!("frame loop cancelled (epoch {})", active.epoch);
        }
    }

    /// Stop the loop and forget every callback. The surface is kept.
    pub fn reset(&self) {
        self.cancel_loop();
        self.inner.callbacks.borrow_mut().clear();
    }

    pub fn is_running(&self) -> bool {
        self.inner.active.borrow().is_some()
    }

    pub fn callback_count(&self) -> usize {
        self.inner.callbacks.borrow().len()
    }

    /// Run one tick: invoke every registered callback once, in order.
    ///
    /// Callbacks registered while the tick runs are picked up on the next one.
    pub fn run_frame(&self) -> Result<(), SketchError> {
        let drawing = self.drawing()?;
        let callbacks = self.inner.callbacks.borrow().clone();
        for callback in callbacks {
            (&mut *callback.borrow_mut())(drawing.as_ref());
        }
        Ok(())
    }

    fn start_loop(&self) -> Result<(), SketchError> {
        if self.inner.active.borrow().is_some() {
            return Ok(());
        }
        let epoch = self.inner.next_epoch.get();
        self.inner.next_epoch.set(epoch + 1);
        let token = self.request_frame(epoch)?;
        *self.inner.active.borrow_mut() = Some(ActiveLoop { epoch, token });
        log::debug!("frame loop started (epoch {epoch})");
        Ok(())
    }

    fn request_frame(&self, epoch: u64) -> Result<S::Token, SketchError> {
        let weak = Rc::downgrade(&self.inner);
        self.inner
            .scheduler
            .borrow_mut()
            .request_frame(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Session { inner }.on_frame(epoch);
                }
            }))
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.inner
            .active
            .borrow()
            .as_ref()
            .is_some_and(|active| active.epoch == epoch)
    }

    fn on_frame(&self, epoch: u64) {
        if !self.is_current(epoch) {
            log::trace!("ignoring stale frame (epoch {epoch})");
            return;
        }

        if let Err(err) = self.run_frame() {
            log::error!("{err}; stopping frame loop");
            self.inner.active.borrow_mut().take();
            return;
        }

        // Cancelled, or cancelled and restarted, while callbacks ran.
        if !self.is_current(epoch) {
            return;
        }

        match self.request_frame(epoch) {
            Ok(token) => {
                if let Some(active) = self.inner.active.borrow_mut().as_mut() {
                    active.token = token;
                }
            }
            Err(err) => {
                log::error!("{err}; stopping frame loop");
                self.inner.active.borrow_mut().take();
            }
        }
    }

    // ─── Lazy stages ────────────────────────────────────────────────────

    /// The surface, created and mounted on first access.
    pub fn surface(&self) -> Result<&P::Surface, SketchError> {
        if let Some(surface) = self.inner.surface.get() {
            return Ok(surface);
        }
        let surface = {
            let options = self.inner.options.borrow();
            let surface = self.inner.provider.borrow_mut().create_surface(&options)?;
            log::debug!(
                "surface created ({}x{})",
                options.surface.width,
                options.surface.height
            );
            surface
        };
        Ok(self.inner.surface.get_or_init(|| surface))
    }

    /// The surface's paint context, obtained on first access.
    pub fn context(&self) -> Result<&ContextOf<P>, SketchError> {
        if let Some(ctx) = self.inner.context.get() {
            return Ok(ctx);
        }
        let ctx = self
            .surface()?
            .context()
            .ok_or(SketchError::ContextUnavailable)?;
        Ok(self.inner.context.get_or_init(|| ctx))
    }

    /// The drawing interface, constructed on first access and shared after.
    pub fn drawing(&self) -> Result<Rc<Drawing<ContextOf<P>>>, SketchError> {
        if let Some(drawing) = self.inner.drawing.get() {
            return Ok(Rc::clone(drawing));
        }
        let ctx = self.context()?.clone();
        let drawing = Rc::new(Drawing::new(ctx, self.surface()?));
        log::debug!("drawing interface created");
        Ok(Rc::clone(self.inner.drawing.get_or_init(|| drawing)))
    }
}
