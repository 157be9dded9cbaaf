//! PoseAnalyzer - the JS-facing handle for one analysis session
//!
//! Owns the render session, the canvas painter, the animation loop and
//! the video subscriptions. The loop callback, the video listeners and
//! the host's method calls all share `AnalyzerCore` through one
//! `Rc<RefCell<_>>`; WASM is single-threaded so they never interleave.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlVideoElement};

use super::animation::AnimationLoop;
use super::dom;
use super::video_events::VideoSubscriptions;
use crate::config::OverlaySettings;
use crate::error::AnalysisError;
use crate::geometry::{normalize_in_rect, Point};
use crate::pose::{PoseFrame, PoseSequence};
use crate::renderer::CanvasPainter;
use crate::session::{needs_rate_update, step_time, ClickOutcome, RenderSession, VideoEvent};
use crate::tools::{KeyCommand, ToolKind};

/// State touched by the render loop and the video listeners
pub(crate) struct AnalyzerCore {
    pub session: RenderSession,
    pub painter: CanvasPainter,
    pub video: HtmlVideoElement,
}

impl AnalyzerCore {
    /// One animation tick: sync playback rate, match frame, paint
    fn render_tick(&mut self) {
        let target = self.session.settings().playback_rate;
        if needs_rate_update(self.video.playback_rate(), target) {
            self.video.set_playback_rate(target);
        }

        let ops = self.session.tick(self.video.current_time());
        self.painter.paint(&ops);
    }

    pub fn on_video_event(&mut self, event: VideoEvent) {
        match event {
            VideoEvent::LoadedMetadata => {
                let (width, height) = (self.video.video_width(), self.video.video_height());
                match self.session.on_metadata(width, height) {
                    Ok(()) => self.painter.resize(width, height),
                    Err(e) => log::warn!("loadedmetadata: {}", e),
                }
            }
            VideoEvent::Error => {
                let err = AnalysisError::Media(dom::media_error_message(&self.video));
                self.session.fail(err);
            }
            other => {
                self.session.handle_video_event(other);
            }
        }
    }

    fn normalize_client(&self, client_x: f64, client_y: f64) -> Option<Point> {
        let rect = self.painter.canvas().get_bounding_client_rect();
        normalize_in_rect(client_x, client_y, rect.left(), rect.top(), rect.width(), rect.height())
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| AnalysisError::from(e).into())
}

/// Video pose-analysis overlay bound to one video and one canvas.
#[wasm_bindgen]
pub struct PoseAnalyzer {
    core: Rc<RefCell<AnalyzerCore>>,
    animation: Option<AnimationLoop>,
    subscriptions: Option<VideoSubscriptions>,
    fullscreen: bool,
}

#[wasm_bindgen]
impl PoseAnalyzer {
    /// @param {HTMLVideoElement} video - playback source
    /// @param {HTMLCanvasElement} canvas - overlay canvas stacked on the video
    /// @param {string} video_id - used in export file names
    #[wasm_bindgen(constructor)]
    pub fn new(video: HtmlVideoElement, canvas: HtmlCanvasElement, video_id: String) -> Result<PoseAnalyzer, JsValue> {
        let painter = CanvasPainter::new(canvas, video.clone())?;
        let core = AnalyzerCore { session: RenderSession::new(video_id), painter, video };

        Ok(PoseAnalyzer {
            core: Rc::new(RefCell::new(core)),
            animation: None,
            subscriptions: None,
            fullscreen: false,
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Subscribe to video events and start the render loop. Calling it
    /// again while running is a no-op.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.animation.as_ref().map(|a| a.is_running()).unwrap_or(false) {
            return Ok(());
        }

        let video = self.core.borrow().video.clone();
        {
            let mut core = self.core.borrow_mut();
            core.session.handle_video_event(VideoEvent::Subscribe);
            // metadata may have loaded before we subscribed
            if video.ready_state() >= 1 {
                core.on_video_event(VideoEvent::LoadedMetadata);
            }
        }
        self.subscriptions = Some(VideoSubscriptions::subscribe(&video, &self.core)?);

        let core = Rc::clone(&self.core);
        self.animation = Some(AnimationLoop::start(move || match core.try_borrow_mut() {
            Ok(mut core) => core.render_tick(),
            Err(_) => log::warn!("skipped frame: analyzer busy"),
        })?);

        log::info!("analyzer started for video '{}'", self.core.borrow().session.video_id());
        Ok(())
    }

    /// Cancel the pending animation frame, remove all video listeners
    /// and return the lifecycle to idle
    pub fn destroy(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.stop();
        }
        self.subscriptions.take();
        self.core.borrow_mut().session.handle_video_event(VideoEvent::Teardown);
        log::debug!("analyzer destroyed");
    }

    /// @returns {string} idle | loading | ready | playing | paused | seeking | failed
    pub fn status(&self) -> String {
        self.core.borrow().session.state().as_str().to_string()
    }

    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.core.borrow().session.last_error().map(|e| e.to_string())
    }

    // ========================================================================
    // Pose data and settings
    // ========================================================================

    /// @param {Array} frames - `[{time, keypoints: [{x, y, score, name}]}]`
    /// @returns {number} frames loaded
    #[wasm_bindgen(js_name = loadPoses)]
    pub fn load_poses(&self, frames: JsValue) -> Result<usize, JsValue> {
        let frames: Vec<PoseFrame> = serde_wasm_bindgen::from_value(frames).map_err(AnalysisError::from)?;
        let poses = PoseSequence::new(frames);
        let count = poses.len();
        self.core.borrow_mut().session.load_poses(poses);
        Ok(count)
    }

    #[wasm_bindgen(js_name = loadPosesJson)]
    pub fn load_poses_json(&self, json: &str) -> Result<usize, JsValue> {
        let poses = PoseSequence::from_json(json)?;
        let count = poses.len();
        self.core.borrow_mut().session.load_poses(poses);
        Ok(count)
    }

    /// Replace all settings; missing fields take defaults and numeric
    /// values are clamped
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, settings: JsValue) -> Result<(), JsValue> {
        let settings: OverlaySettings = serde_wasm_bindgen::from_value(settings).map_err(AnalysisError::from)?;
        self.core.borrow_mut().session.apply_settings(settings);
        Ok(())
    }

    /// Change only the fields present in `partial`
    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(&self, partial: JsValue) -> Result<(), JsValue> {
        let patch: serde_json::Value = serde_wasm_bindgen::from_value(partial).map_err(AnalysisError::from)?;
        let mut core = self.core.borrow_mut();
        let settings = core.session.settings().merged(patch)?;
        core.session.apply_settings(settings);
        Ok(())
    }

    /// Playback rate pushed to the video on the next tick, clamped to
    /// [0.1, 2.0]
    #[wasm_bindgen(js_name = setPlaybackRate)]
    pub fn set_playback_rate(&self, rate: f64) -> f64 {
        let mut core = self.core.borrow_mut();
        let settings = OverlaySettings { playback_rate: rate, ..core.session.settings().clone() };
        core.session.apply_settings(settings);
        core.session.settings().playback_rate
    }

    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_js(self.core.borrow().session.settings())
    }

    // ========================================================================
    // Pointer and keyboard
    // ========================================================================

    /// @returns {object} `{kind, ...}` describing what the click did
    #[wasm_bindgen(js_name = handleClick)]
    pub fn handle_click(&self, client_x: f64, client_y: f64) -> Result<JsValue, JsValue> {
        let mut core = self.core.borrow_mut();
        let outcome = match core.normalize_client(client_x, client_y) {
            Some(p) => core.session.handle_click(p),
            None => ClickOutcome::Ignored,
        };
        to_js(&outcome)
    }

    #[wasm_bindgen(js_name = handlePointerMove)]
    pub fn handle_pointer_move(&self, client_x: f64, client_y: f64) {
        let mut core = self.core.borrow_mut();
        match core.normalize_client(client_x, client_y) {
            Some(p) => core.session.pointer_moved(p),
            None => core.session.pointer_left(),
        }
    }

    #[wasm_bindgen(js_name = handlePointerLeave)]
    pub fn handle_pointer_leave(&self) {
        self.core.borrow_mut().session.pointer_left();
    }

    /// @param {string} key - `KeyboardEvent.key`
    /// @returns {boolean} whether the key was a shortcut
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str) -> bool {
        let command = self.core.borrow_mut().session.handle_key(key);
        match command {
            Some(KeyCommand::StepBackward) => self.step_frame(-1),
            Some(KeyCommand::StepForward) => self.step_frame(1),
            _ => {}
        }
        command.is_some()
    }

    /// Seek one frame (1/30 s) in `direction`'s sign
    #[wasm_bindgen(js_name = stepFrame)]
    pub fn step_frame(&self, direction: i32) {
        let core = self.core.borrow();
        let target = step_time(core.video.current_time(), core.video.duration(), direction);
        core.video.set_current_time(target);
    }

    // ========================================================================
    // Tools
    // ========================================================================

    /// @param {string} tool - none | measure | annotate | angle | calibrate
    /// @returns {boolean} false for an unknown tool name
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, tool: &str) -> bool {
        match ToolKind::parse(tool) {
            Some(kind) => {
                self.core.borrow_mut().session.set_tool(kind);
                true
            }
            None => {
                log::warn!("unknown tool '{}'", tool);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = activeTool)]
    pub fn active_tool(&self) -> String {
        self.core.borrow().session.active_tool().as_str().to_string()
    }

    /// Text for the annotation prompted by the last click
    /// @returns {string | undefined} the annotation id, undefined if blank
    #[wasm_bindgen(js_name = submitAnnotationText)]
    pub fn submit_annotation_text(&self, text: &str) -> Option<String> {
        self.core.borrow_mut().session.submit_annotation_text(text)
    }

    #[wasm_bindgen(js_name = selectedKeypoint)]
    pub fn selected_keypoint(&self) -> Option<u32> {
        self.core.borrow().session.selected_keypoint().map(|i| i as u32)
    }

    // ========================================================================
    // Committed items
    // ========================================================================

    /// @returns {Array} measurements with `distancePixels` / `distanceMeters`
    /// under the current scale
    pub fn measurements(&self) -> Result<JsValue, JsValue> {
        to_js(&self.core.borrow().session.measurement_summaries())
    }

    pub fn annotations(&self) -> Result<JsValue, JsValue> {
        to_js(self.core.borrow().session.annotations())
    }

    /// @returns {Array} user-defined angles
    pub fn angles(&self) -> Result<JsValue, JsValue> {
        to_js(self.core.borrow().session.user_angles())
    }

    /// @returns {Array} automatic angles for the current frame followed by
    /// user-defined ones
    #[wasm_bindgen(js_name = currentAngles)]
    pub fn current_angles(&self) -> Result<JsValue, JsValue> {
        to_js(&self.core.borrow().session.current_angles())
    }

    #[wasm_bindgen(js_name = deleteMeasurement)]
    pub fn delete_measurement(&self, id: &str) -> bool {
        self.core.borrow_mut().session.delete_measurement(id)
    }

    #[wasm_bindgen(js_name = deleteAnnotation)]
    pub fn delete_annotation(&self, id: &str) -> bool {
        self.core.borrow_mut().session.delete_annotation(id)
    }

    #[wasm_bindgen(js_name = deleteAngle)]
    pub fn delete_angle(&self, id: &str) -> bool {
        self.core.borrow_mut().session.delete_angle(id)
    }

    #[wasm_bindgen(js_name = clearMeasurements)]
    pub fn clear_measurements(&self) {
        self.core.borrow_mut().session.clear_measurements();
    }

    #[wasm_bindgen(js_name = clearAnnotations)]
    pub fn clear_annotations(&self) {
        self.core.borrow_mut().session.clear_annotations();
    }

    #[wasm_bindgen(js_name = clearAngles)]
    pub fn clear_angles(&self) {
        self.core.borrow_mut().session.clear_angles();
    }

    #[wasm_bindgen(js_name = resetTrajectories)]
    pub fn reset_trajectories(&self) {
        self.core.borrow_mut().session.reset_trajectories();
    }

    // ========================================================================
    // Scale
    // ========================================================================

    #[wasm_bindgen(js_name = pixelsPerMeter)]
    pub fn pixels_per_meter(&self) -> f64 {
        self.core.borrow().session.scale().pixels_per_meter()
    }

    /// Meters for a pixel length, rounded to 3 decimals
    #[wasm_bindgen(js_name = convertPixelsToMeters)]
    pub fn convert_pixels_to_meters(&self, pixels: f64) -> f64 {
        self.core.borrow().session.convert_pixels_to_meters(pixels)
    }

    // ========================================================================
    // Capture and export
    // ========================================================================

    /// Rasterize the current frame and snapshot the overlay state
    /// @returns {string} capture id
    #[wasm_bindgen(js_name = captureFrame)]
    pub fn capture_frame(&self, name: &str, notes: &str) -> Result<String, JsValue> {
        let mut core = self.core.borrow_mut();
        let settings = core.session.settings();
        let overlay = settings.capture_include_overlay.then(|| core.painter.canvas());
        let image = dom::rasterize_frame(&core.video, overlay, settings.capture_quality)?;

        let id = core.session.capture(name, notes, image);
        log::info!("captured frame {} at {:.2}s", id, core.session.video_time());
        Ok(id)
    }

    pub fn captures(&self) -> Result<JsValue, JsValue> {
        let core = self.core.borrow();
        let captures: Vec<_> = core.session.captures().collect();
        to_js(&captures)
    }

    #[wasm_bindgen(js_name = deleteCapture)]
    pub fn delete_capture(&self, id: &str) -> bool {
        self.core.borrow_mut().session.delete_capture(id)
    }

    /// Serialize the session and download it as JSON
    /// @param {object} video_metadata - passed through into the document
    /// @returns {string} the downloaded file name
    #[wasm_bindgen(js_name = exportAnalysis)]
    pub fn export_analysis(&self, video_metadata: JsValue) -> Result<String, JsValue> {
        let metadata: serde_json::Value = if video_metadata.is_undefined() || video_metadata.is_null() {
            serde_json::Value::Null
        } else {
            serde_wasm_bindgen::from_value(video_metadata).map_err(AnalysisError::from)?
        };

        let core = self.core.borrow();
        let document = core.session.export_document(metadata, chrono::Utc::now());
        let file_name = document.file_name();
        dom::download_text(&file_name, &document.to_json()?, "application/json")?;

        log::info!("exported analysis to {}", file_name);
        Ok(file_name)
    }

    // ========================================================================
    // Fullscreen
    // ========================================================================

    /// Toggle fullscreen on the canvas' parent (the video container).
    /// On failure the previous state is kept.
    /// @returns {boolean} whether fullscreen is active
    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&mut self) -> bool {
        let target = {
            let core = self.core.borrow();
            let canvas = core.painter.canvas();
            canvas.parent_element().unwrap_or_else(|| canvas.clone().into())
        };
        match dom::toggle_fullscreen(&target) {
            Ok(active) => self.fullscreen = active,
            Err(e) => log::warn!("fullscreen toggle failed: {}", e),
        }
        self.fullscreen
    }
}

impl Drop for PoseAnalyzer {
    fn drop(&mut self) {
        self.animation.take();
        self.subscriptions.take();
    }
}
