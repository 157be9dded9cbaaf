//! Video element event subscriptions
//!
//! One listener per lifecycle event, all removed together on drop so no
//! callback fires after teardown.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlVideoElement};

use super::analyzer::AnalyzerCore;
use crate::error::{describe_js_error, AnalysisError};
use crate::session::VideoEvent;

pub struct VideoSubscriptions {
    video: HtmlVideoElement,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl VideoSubscriptions {
    pub fn subscribe(video: &HtmlVideoElement, core: &Rc<RefCell<AnalyzerCore>>) -> Result<Self, AnalysisError> {
        let mut subs = Self { video: video.clone(), listeners: Vec::new() };

        for event in VideoEvent::DOM_EVENTS {
            let Some(name) = event.dom_name() else { continue };
            let core = Rc::clone(core);
            let callback = Closure::wrap(Box::new(move |_event: Event| {
                match core.try_borrow_mut() {
                    Ok(mut core) => core.on_video_event(event),
                    Err(_) => log::warn!("dropped '{}' event: analyzer busy", name),
                }
            }) as Box<dyn FnMut(Event)>);

            video
                .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
                .map_err(|e| AnalysisError::Platform(describe_js_error(&e)))?;
            // registered before push so drop only removes attached listeners
            subs.listeners.push((name, callback));
        }

        Ok(subs)
    }
}

impl Drop for VideoSubscriptions {
    fn drop(&mut self) {
        for (name, callback) in self.listeners.drain(..) {
            if let Err(e) = self
                .video
                .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove '{}' listener: {}", name, describe_js_error(&e));
            }
        }
    }
}
