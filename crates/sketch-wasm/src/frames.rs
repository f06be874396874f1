//! `requestAnimationFrame` scheduler.

use sketch_core::{FrameScheduler, SketchError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::describe;

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct AnimationFrames {
    window: Window,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

/// One pending animation frame. Owns the JS closure until it fires or is
/// cancelled.
pub struct FrameToken {
    id: i32,
    closure: FrameClosure,
}

impl FrameScheduler for AnimationFrames {
    type Token = FrameToken;

    fn request_frame(&mut self, frame: Box<dyn FnOnce()>) -> Result<FrameToken, SketchError> {
        let holder: FrameClosure = Rc::new(RefCell::new(None));
        let holder_for_cb = Rc::clone(&holder);
        let mut frame = Some(frame);
        let cb = Closure::wrap(Box::new(move |_ts: f64| {
            if let Some(frame) = frame.take() {
                frame();
            }
            holder_for_cb.borrow_mut().take();
        }) as Box<dyn FnMut(f64)>);

        let id = self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|err| SketchError::Scheduler(describe(&err)))?;
        *holder.borrow_mut() = Some(cb);
        Ok(FrameToken {
            id,
            closure: holder,
        })
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if let Err(err) = self.window.cancel_animation_frame(token.id) {
            log::debug!("cancelAnimationFrame({}) failed: {}", token.id, describe(&err));
        }
        token.closure.borrow_mut().take();
    }
}
