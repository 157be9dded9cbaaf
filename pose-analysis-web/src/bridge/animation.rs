//! requestAnimationFrame loop
//!
//! The callback reschedules itself after every frame, paused video
//! included, until `stop` cancels the pending request and drops the
//! closure.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::error::{describe_js_error, AnalysisError};

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct AnimationLoop {
    /// Id of the pending request, if any
    handle: Rc<Cell<Option<i32>>>,
    /// The closure holds a clone of this Rc to reschedule itself; taking
    /// it out on stop breaks the cycle
    closure: FrameClosure,
}

impl AnimationLoop {
    pub fn start(mut on_frame: impl FnMut() + 'static) -> Result<Self, AnalysisError> {
        let handle = Rc::new(Cell::new(None));
        let closure: FrameClosure = Rc::new(RefCell::new(None));

        let handle_cb = Rc::clone(&handle);
        let closure_cb = Rc::clone(&closure);
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            handle_cb.set(None);
            on_frame();

            if let Some(cb) = closure_cb.borrow().as_ref() {
                match request_frame(cb) {
                    Ok(id) => handle_cb.set(Some(id)),
                    Err(e) => log::error!("render loop stopped: {}", e),
                }
            }
        }) as Box<dyn FnMut()>));

        let id = match closure.borrow().as_ref() {
            Some(cb) => request_frame(cb)?,
            None => return Err(AnalysisError::Platform("animation callback missing".into())),
        };
        handle.set(Some(id));

        Ok(Self { handle, closure })
    }

    pub fn is_running(&self) -> bool {
        self.closure.borrow().is_some()
    }

    pub fn stop(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {}", describe_js_error(&e));
                }
            }
        }
        self.closure.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Result<i32, AnalysisError> {
    web_sys::window()
        .ok_or_else(|| AnalysisError::Platform("no window".into()))?
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map_err(|e| AnalysisError::Platform(describe_js_error(&e)))
}
