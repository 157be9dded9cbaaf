//! Render session - all overlay state for one video, owned by the host
//! bridge and passed by reference into the draw pipeline each tick

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::capture::{CaptureContent, CaptureList, CapturedFrame};
use super::export::{truncate_image, AnalysisDocument, CalibrationInfo};
use super::video::{VideoEvent, VideoLifecycle, VideoState};
use crate::config::OverlaySettings;
use crate::error::AnalysisError;
use crate::geometry::{CanvasSize, PixelScale, Point};
use crate::pose::{PoseFrame, PoseSequence};
use crate::renderer::{build_scene, DrawOp, Scene};
use crate::tools::{
    automatic_angles, ActiveTool, AngleMeasurement, Annotation, CanvasClick, CompletedGesture,
    KeyCommand, Measurement, MeasurementSummary, ToolKind,
};
use crate::tracking::TrajectoryTracker;

/// One frame step at 30 fps (seconds)
pub const FRAME_STEP: f64 = 1.0 / 30.0;

/// Max normalized distance for click-to-select a keypoint
pub const SELECT_RADIUS: f64 = 0.05;

/// Result of a canvas click, reported back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClickOutcome {
    Ignored,
    /// Point accumulated, gesture not complete
    Pending { count: usize },
    MeasurementAdded { id: String },
    /// Host should prompt for text and call `submit_annotation_text`
    AnnotationRequested,
    AngleAdded { id: String },
    Calibrated {
        #[serde(rename = "pixelsPerMeter")]
        pixels_per_meter: f64,
    },
    /// Gesture completed but degenerate (coincident points)
    Rejected,
    KeypointSelected { index: Option<usize> },
}

pub struct RenderSession {
    video_id: String,
    poses: PoseSequence,
    settings: OverlaySettings,
    lifecycle: VideoLifecycle,
    canvas_size: CanvasSize,
    scale: PixelScale,
    trajectories: TrajectoryTracker,
    current: Option<usize>,
    video_time: f64,
    tool: ActiveTool,
    /// Click position and video time awaiting annotation text
    pending_annotation: Option<(Point, f64)>,
    measurements: Vec<Measurement>,
    annotations: Vec<Annotation>,
    user_angles: Vec<AngleMeasurement>,
    angles_created: usize,
    captures: CaptureList,
    selected: Option<usize>,
    /// Canvas pixels
    pointer: Option<Point>,
    last_error: Option<AnalysisError>,
}

impl RenderSession {
    pub fn new(video_id: impl Into<String>) -> Self {
        let settings = OverlaySettings::default();
        Self {
            video_id: video_id.into(),
            poses: PoseSequence::default(),
            trajectories: TrajectoryTracker::new(settings.trajectory_length),
            settings,
            lifecycle: VideoLifecycle::default(),
            canvas_size: CanvasSize::default(),
            scale: PixelScale::default(),
            current: None,
            video_time: 0.0,
            tool: ActiveTool::None,
            pending_annotation: None,
            measurements: Vec::new(),
            annotations: Vec::new(),
            user_angles: Vec::new(),
            angles_created: 0,
            captures: CaptureList::default(),
            selected: None,
            pointer: None,
            last_error: None,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    // ========================================================================
    // POSE DATA AND SETTINGS
    // ========================================================================

    pub fn load_poses(&mut self, poses: PoseSequence) {
        log::info!("loaded {} pose frames ({:.2}s)", poses.len(), poses.duration());
        self.poses = poses;
        self.current = None;
        self.selected = None;
        self.reset_trajectories();
    }

    pub fn poses(&self) -> &PoseSequence {
        &self.poses
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: OverlaySettings) {
        let settings = settings.sanitized();
        self.trajectories.set_max_len(settings.trajectory_length);
        self.settings = settings;
    }

    // ========================================================================
    // VIDEO LIFECYCLE
    // ========================================================================

    pub fn state(&self) -> VideoState {
        self.lifecycle.state()
    }

    pub fn handle_video_event(&mut self, event: VideoEvent) -> Option<VideoState> {
        if matches!(event, VideoEvent::Seeking | VideoEvent::Seeked) {
            self.reset_trajectories();
        }
        self.lifecycle.handle(event)
    }

    /// Size the canvas to the native video and derive the initial scale
    pub fn on_metadata(&mut self, width: u32, height: u32) -> Result<(), AnalysisError> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::NoVideoDimensions);
        }
        self.canvas_size = CanvasSize::new(width as f64, height as f64);
        self.scale = PixelScale::from_video_height(height as f64, self.settings.reference_height);
        log::info!(
            "video {}x{}, initial scale {:.2} px/m",
            width,
            height,
            self.scale.pixels_per_meter()
        );
        self.handle_video_event(VideoEvent::LoadedMetadata);
        Ok(())
    }

    /// Enter the failed state, keeping `err` for the host
    pub fn fail(&mut self, err: AnalysisError) {
        log::error!("{}", err);
        self.last_error = Some(err);
        self.handle_video_event(VideoEvent::Error);
    }

    pub fn last_error(&self) -> Option<&AnalysisError> {
        self.last_error.as_ref()
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    // ========================================================================
    // RENDER TICK
    // ========================================================================

    /// Match the frame for `time`, update trajectories and build the
    /// display list. Empty outside drawable lifecycle states.
    pub fn tick(&mut self, time: f64) -> Vec<DrawOp> {
        self.video_time = time;
        if !self.state().is_drawable() {
            return Vec::new();
        }

        self.current = self.poses.nearest_index(time);
        if let Some(frame) = self.current.and_then(|i| self.poses.get(i)) {
            self.trajectories.record(frame);
        }

        let angles = self.current_angles();
        let scene = Scene {
            frame: self.current_frame(),
            settings: &self.settings,
            size: self.canvas_size,
            scale: &self.scale,
            trajectories: &self.trajectories,
            measurements: &self.measurements,
            annotations: &self.annotations,
            angles: &angles,
            tool: &self.tool,
            selected: self.selected,
            pointer: self.pointer,
        };
        build_scene(&scene)
    }

    pub fn current_frame(&self) -> Option<&PoseFrame> {
        self.current.and_then(|i| self.poses.get(i))
    }

    pub fn video_time(&self) -> f64 {
        self.video_time
    }

    pub fn trajectories(&self) -> &TrajectoryTracker {
        &self.trajectories
    }

    pub fn reset_trajectories(&mut self) {
        self.trajectories.clear();
    }

    /// Automatic angles of the matched frame followed by user angles
    pub fn current_angles(&self) -> Vec<AngleMeasurement> {
        let mut angles = self
            .current_frame()
            .map(|frame| automatic_angles(frame, self.canvas_size))
            .unwrap_or_default();
        angles.extend(self.user_angles.iter().cloned());
        angles
    }

    // ========================================================================
    // POINTER AND TOOLS
    // ========================================================================

    pub fn active_tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() != kind {
            log::debug!("tool: {} -> {}", self.tool.kind().as_str(), kind.as_str());
        }
        self.tool = ActiveTool::from_kind(kind);
        self.pending_annotation = None;
    }

    pub fn handle_click(&mut self, normalized: Point) -> ClickOutcome {
        if !normalized.is_finite() {
            return ClickOutcome::Ignored;
        }
        let normalized = normalized.clamp_unit();
        let click = CanvasClick { normalized, pixel: normalized.to_pixels(self.canvas_size) };

        if self.tool == ActiveTool::None {
            self.selected = self.nearest_keypoint(normalized);
            return ClickOutcome::KeypointSelected { index: self.selected };
        }

        match self.tool.click(click) {
            None => ClickOutcome::Pending { count: self.tool.pending().len() },
            Some(gesture) => self.commit(gesture),
        }
    }

    fn commit(&mut self, gesture: CompletedGesture) -> ClickOutcome {
        match gesture {
            CompletedGesture::Measurement(points) => {
                let m = Measurement::new(points, self.video_time);
                let id = m.id.clone();
                self.measurements.push(m);
                ClickOutcome::MeasurementAdded { id }
            }
            CompletedGesture::Annotation(at) => {
                self.pending_annotation = Some((at, self.video_time));
                ClickOutcome::AnnotationRequested
            }
            CompletedGesture::Angle(points) => {
                match AngleMeasurement::user_defined(points, self.angles_created + 1) {
                    Some(angle) => {
                        self.angles_created += 1;
                        let id = angle.id.clone().unwrap_or_default();
                        self.user_angles.push(angle);
                        ClickOutcome::AngleAdded { id }
                    }
                    None => ClickOutcome::Rejected,
                }
            }
            CompletedGesture::Calibration([p1, p2]) => {
                match self.scale.calibrate(p1, p2, self.settings.reference_height) {
                    Some(pixels_per_meter) => {
                        log::info!(
                            "calibrated: {:.2} px/m against {:.2} m",
                            pixels_per_meter,
                            self.settings.reference_height
                        );
                        ClickOutcome::Calibrated { pixels_per_meter }
                    }
                    None => ClickOutcome::Rejected,
                }
            }
        }
    }

    /// Commit the annotation prompted by the last click. Blank text
    /// drops it silently.
    pub fn submit_annotation_text(&mut self, text: &str) -> Option<String> {
        let (at, timestamp) = self.pending_annotation.take()?;
        let annotation = Annotation::new(
            at,
            text,
            &self.settings.annotation_color,
            self.settings.annotation_size,
            timestamp,
        )?;
        let id = annotation.id.clone();
        self.annotations.push(annotation);
        Some(id)
    }

    fn nearest_keypoint(&self, at: Point) -> Option<usize> {
        let frame = self.current_frame()?;
        frame
            .keypoints()
            .iter()
            .enumerate()
            .filter(|(_, kp)| kp.is_confident(self.settings.min_confidence))
            .map(|(i, kp)| (i, kp.position().distance_to(&at)))
            .filter(|(_, d)| *d <= SELECT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    pub fn selected_keypoint(&self) -> Option<usize> {
        self.selected
    }

    pub fn pointer_moved(&mut self, normalized: Point) {
        self.pointer = normalized
            .is_finite()
            .then(|| normalized.clamp_unit().to_pixels(self.canvas_size));
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
    }

    /// Apply a keyboard shortcut. Frame steps need the video element and
    /// are returned for the caller to perform.
    pub fn handle_key(&mut self, key: &str) -> Option<KeyCommand> {
        let command = KeyCommand::from_key(key)?;
        match command {
            KeyCommand::SelectTool(kind) => self.set_tool(kind),
            KeyCommand::Cancel => self.set_tool(ToolKind::None),
            KeyCommand::ResetTrajectories => self.reset_trajectories(),
            KeyCommand::ToggleMagnifier => {
                self.settings.magnifier_enabled = !self.settings.magnifier_enabled;
            }
            KeyCommand::StepBackward | KeyCommand::StepForward => {}
        }
        Some(command)
    }

    // ========================================================================
    // COMMITTED ITEMS
    // ========================================================================

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Measurements with lengths under the current scale
    pub fn measurement_summaries(&self) -> Vec<MeasurementSummary> {
        self.measurements
            .iter()
            .map(|m| m.summarize(self.canvas_size, &self.scale))
            .collect()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn user_angles(&self) -> &[AngleMeasurement] {
        &self.user_angles
    }

    pub fn delete_measurement(&mut self, id: &str) -> bool {
        remove_by(&mut self.measurements, |m| m.id == id)
    }

    pub fn delete_annotation(&mut self, id: &str) -> bool {
        remove_by(&mut self.annotations, |a| a.id == id)
    }

    pub fn delete_angle(&mut self, id: &str) -> bool {
        remove_by(&mut self.user_angles, |a| a.id.as_deref() == Some(id))
    }

    pub fn clear_measurements(&mut self) {
        self.measurements.clear();
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }

    pub fn clear_angles(&mut self) {
        self.user_angles.clear();
    }

    // ========================================================================
    // SCALE
    // ========================================================================

    pub fn scale(&self) -> &PixelScale {
        &self.scale
    }

    pub fn convert_pixels_to_meters(&self, pixels: f64) -> f64 {
        self.scale.convert_pixels_to_meters(pixels)
    }

    // ========================================================================
    // CAPTURE AND EXPORT
    // ========================================================================

    /// Snapshot current overlay state with an already rasterized image.
    /// Returns the new capture's id.
    pub fn capture(&mut self, name: &str, notes: &str, image_data: String) -> String {
        let frame = CapturedFrame::new(
            name,
            notes,
            CaptureContent {
                time: self.video_time,
                image_data,
                pose_data: self.current_frame().cloned(),
                measurements: self.measurement_summaries(),
                annotations: self.annotations.clone(),
                angles: self.current_angles(),
                settings: self.settings.clone(),
            },
        );
        let id = frame.id.clone();
        self.captures.push(frame);
        id
    }

    pub fn captures(&self) -> impl Iterator<Item = &CapturedFrame> {
        self.captures.iter()
    }

    pub fn delete_capture(&mut self, id: &str) -> bool {
        self.captures.remove(id)
    }

    pub fn export_document(&self, video_metadata: serde_json::Value, at: DateTime<Utc>) -> AnalysisDocument<'_> {
        AnalysisDocument {
            video_id: &self.video_id,
            video_metadata,
            exported_at: at,
            pose_data: &self.poses,
            measurements: self.measurement_summaries(),
            annotations: &self.annotations,
            angles: &self.user_angles,
            captured_frames: self.captures.iter().map(truncate_image).collect(),
            calibration: CalibrationInfo {
                pixels_per_meter: self.scale.pixels_per_meter(),
                reference_height: self.settings.reference_height,
            },
            settings: &self.settings,
        }
    }
}

fn remove_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !pred(item));
    items.len() != before
}

/// Seek target one frame away, clamped to the video
pub fn step_time(current: f64, duration: f64, direction: i32) -> f64 {
    let upper = if duration.is_finite() && duration > 0.0 { duration } else { f64::INFINITY };
    let delta = FRAME_STEP * direction.signum() as f64;
    (current + delta).clamp(0.0, upper)
}

/// Whether the element's rate differs from the target enough to push
pub fn needs_rate_update(current: f64, target: f64) -> bool {
    (current - target).abs() > 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{uniform_frame, Keypoint, RIGHT_ANKLE, RIGHT_KNEE};

    fn ready_session(width: u32, height: u32) -> RenderSession {
        let mut s = RenderSession::new("vid");
        s.handle_video_event(VideoEvent::Subscribe);
        s.on_metadata(width, height).unwrap();
        s
    }

    fn moving_sequence(n: usize) -> PoseSequence {
        PoseSequence::new(
            (0..n)
                .map(|i| uniform_frame(i as f64 / 30.0, i as f64 / 100.0, 0.5, 0.9))
                .collect(),
        )
    }

    #[test]
    fn test_trajectory_length_scenario() {
        let mut s = ready_session(640, 480);
        s.apply_settings(OverlaySettings { trajectory_length: 10, ..Default::default() });
        s.load_poses(moving_sequence(15));
        for i in 0..15 {
            s.tick(i as f64 / 30.0);
        }
        let ring = s.trajectories().ring(RIGHT_ANKLE).unwrap();
        assert_eq!(ring.len(), 10);
        assert!((ring.front().unwrap().x - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_every_tick_records_same_frame() {
        let mut s = ready_session(640, 480);
        s.apply_settings(OverlaySettings { trajectory_length: 10, ..Default::default() });
        s.load_poses(PoseSequence::new(vec![uniform_frame(1.0, 0.3, 0.4, 0.9)]));
        for _ in 0..15 {
            s.tick(1.0);
        }
        let ring = s.trajectories().ring(RIGHT_ANKLE).unwrap();
        assert_eq!(ring.len(), 10);
        assert!(ring.iter().all(|p| (p.x - 0.3).abs() < 1e-9 && (p.y - 0.4).abs() < 1e-9));
    }

    #[test]
    fn test_seek_clears_trajectories() {
        let mut s = ready_session(640, 480);
        s.load_poses(moving_sequence(10));
        for i in 0..10 {
            s.tick(i as f64 / 30.0);
        }
        assert!(!s.trajectories().is_empty());
        s.handle_video_event(VideoEvent::Seeking);
        assert!(s.trajectories().is_empty());
        s.handle_video_event(VideoEvent::Seeked);
        assert_eq!(s.state(), VideoState::Ready);

        s.tick(9.0 / 30.0);
        assert_eq!(s.trajectories().ring(RIGHT_ANKLE).unwrap().len(), 1);
    }

    #[test]
    fn test_frame_gap_scenario() {
        let mut s = ready_session(640, 480);
        s.load_poses(PoseSequence::new(vec![uniform_frame(1.0, 0.5, 0.5, 0.9)]));
        s.tick(1.05);
        assert_eq!(s.current_frame().map(|f| f.time()), Some(1.0));
        s.tick(5.0);
        assert!(s.current_frame().is_none());
    }

    #[test]
    fn test_no_drawing_before_ready() {
        let mut s = RenderSession::new("vid");
        s.load_poses(moving_sequence(3));
        assert!(s.tick(0.0).is_empty());
        assert!(s.trajectories().is_empty());
    }

    #[test]
    fn test_measurement_commit_two_clicks() {
        let mut s = ready_session(400, 800);
        s.set_tool(ToolKind::Measure);
        s.tick(2.0);
        assert_eq!(s.handle_click(Point::new(0.5, 0.2)), ClickOutcome::Pending { count: 1 });
        assert!(matches!(s.handle_click(Point::new(0.5, 0.8)), ClickOutcome::MeasurementAdded { .. }));
        assert_eq!(s.measurements().len(), 1);
        assert_eq!(s.measurements()[0].timestamp, 2.0);

        assert_eq!(s.handle_click(Point::new(0.1, 0.1)), ClickOutcome::Pending { count: 1 });
        assert_eq!(s.measurements().len(), 1);
    }

    #[test]
    fn test_calibration_scenario() {
        let mut s = ready_session(400, 800);
        s.set_tool(ToolKind::Calibrate);
        s.handle_click(Point::new(0.5, 0.2));
        match s.handle_click(Point::new(0.5, 0.8)) {
            ClickOutcome::Calibrated { pixels_per_meter } => {
                assert!((pixels_per_meter - 480.0 / 1.75).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(s.active_tool(), ToolKind::None);
        assert!((s.convert_pixels_to_meters(480.0) - 1.75).abs() <= 0.001);
    }

    #[test]
    fn test_measurement_distance_follows_recalibration() {
        let mut s = ready_session(400, 800);
        s.set_tool(ToolKind::Measure);
        s.handle_click(Point::new(0.5, 0.2));
        s.handle_click(Point::new(0.5, 0.8));
        let before = s.measurement_summaries()[0].distance_meters;

        s.set_tool(ToolKind::Calibrate);
        s.handle_click(Point::new(0.5, 0.2));
        s.handle_click(Point::new(0.5, 0.8));
        let after = s.measurement_summaries()[0].distance_meters;
        assert_ne!(before, after);
        assert_eq!(after, 1.75);
    }

    #[test]
    fn test_annotation_flow() {
        let mut s = ready_session(640, 480);
        s.set_tool(ToolKind::Annotate);
        assert_eq!(s.submit_annotation_text("orphan"), None);

        assert_eq!(s.handle_click(Point::new(0.3, 0.3)), ClickOutcome::AnnotationRequested);
        assert_eq!(s.submit_annotation_text("   "), None);
        assert!(s.annotations().is_empty());

        s.handle_click(Point::new(0.3, 0.3));
        let id = s.submit_annotation_text("heel strike").unwrap();
        assert_eq!(s.annotations()[0].color, s.settings().annotation_color);
        assert!(s.delete_annotation(&id));
        assert!(!s.delete_annotation(&id));
    }

    #[test]
    fn test_user_angle_and_merge() {
        let mut s = ready_session(1000, 1000);
        s.set_tool(ToolKind::Angle);
        s.handle_click(Point::new(0.2, 0.1));
        s.handle_click(Point::new(0.1, 0.1));
        let id = match s.handle_click(Point::new(0.1, 0.2)) {
            ClickOutcome::AngleAdded { id } => id,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(s.user_angles()[0].angle, 90.0);
        assert_eq!(s.user_angles()[0].name, "Angle 1");

        // no matched frame: only user angles
        assert_eq!(s.current_angles().len(), 1);

        s.load_poses(PoseSequence::new(vec![uniform_frame(0.0, 0.5, 0.5, 0.9)]));
        s.tick(0.0);
        // coincident joints make every automatic angle degenerate
        assert_eq!(s.current_angles().len(), 1);

        assert!(s.delete_angle(&id));
        assert!(s.current_angles().is_empty());
    }

    #[test]
    fn test_coincident_angle_rejected() {
        let mut s = ready_session(100, 100);
        s.set_tool(ToolKind::Angle);
        s.handle_click(Point::new(0.5, 0.5));
        s.handle_click(Point::new(0.5, 0.5));
        assert_eq!(s.handle_click(Point::new(0.7, 0.5)), ClickOutcome::Rejected);
        assert!(s.user_angles().is_empty());
    }

    #[test]
    fn test_keypoint_selection() {
        let mut s = ready_session(100, 100);
        let mut kps: Vec<Keypoint> = uniform_frame(0.0, 0.0, 0.0, 0.9).keypoints().to_vec();
        kps[RIGHT_KNEE].x = 0.6;
        kps[RIGHT_KNEE].y = 0.6;
        s.load_poses(PoseSequence::new(vec![PoseFrame::new(0.0, kps).unwrap()]));
        s.tick(0.0);

        assert_eq!(s.handle_click(Point::new(0.62, 0.61)), ClickOutcome::KeypointSelected { index: Some(RIGHT_KNEE) });
        assert_eq!(s.selected_keypoint(), Some(RIGHT_KNEE));
        assert_eq!(s.handle_click(Point::new(0.9, 0.1)), ClickOutcome::KeypointSelected { index: None });
    }

    #[test]
    fn test_keyboard() {
        let mut s = ready_session(100, 100);
        assert_eq!(s.handle_key("m"), Some(KeyCommand::SelectTool(ToolKind::Measure)));
        s.handle_click(Point::new(0.1, 0.1));
        assert_eq!(s.handle_key("Escape"), Some(KeyCommand::Cancel));
        assert_eq!(s.active_tool(), ToolKind::None);

        assert!(!s.settings().magnifier_enabled);
        s.handle_key("z");
        assert!(s.settings().magnifier_enabled);
        assert_eq!(s.handle_key("ArrowLeft"), Some(KeyCommand::StepBackward));
        assert_eq!(s.handle_key("F5"), None);
    }

    #[test]
    fn test_media_error() {
        let mut s = RenderSession::new("vid");
        s.handle_video_event(VideoEvent::Subscribe);
        s.fail(AnalysisError::Media("MEDIA_ERR_DECODE".into()));
        assert_eq!(s.state(), VideoState::Failed);
        assert!(matches!(s.last_error(), Some(AnalysisError::Media(m)) if m == "MEDIA_ERR_DECODE"));
        assert_eq!(s.last_error().map(|e| e.to_string()).as_deref(), Some("media error: MEDIA_ERR_DECODE"));
        assert!(s.tick(0.0).is_empty());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut s = RenderSession::new("vid");
        assert!(matches!(s.on_metadata(0, 480), Err(AnalysisError::NoVideoDimensions)));
    }

    #[test]
    fn test_capture_and_export() {
        let mut s = ready_session(400, 800);
        s.load_poses(PoseSequence::new(vec![uniform_frame(1.0, 0.5, 0.5, 0.9)]));
        s.set_tool(ToolKind::Measure);
        s.handle_click(Point::new(0.5, 0.2));
        s.handle_click(Point::new(0.5, 0.8));
        s.tick(1.0);
        s.capture("", "", format!("data:image/jpeg;base64,{}", "A".repeat(300)));
        assert_eq!(s.captures().count(), 1);
        let capture = s.captures().next().unwrap();
        assert!(capture.pose_data.is_some());
        assert_eq!(capture.measurements.len(), 1);

        let doc = s.export_document(serde_json::json!({}), Utc::now());
        assert!(doc.file_name().starts_with("analisis_vid_"));
        assert_eq!(doc.captured_frames[0].image_data.len(), 103);
        assert_eq!(doc.measurements[0].distance_meters, s.measurement_summaries()[0].distance_meters);
    }

    #[test]
    fn test_step_time() {
        assert!((step_time(1.0, 10.0, 1) - (1.0 + FRAME_STEP)).abs() < 1e-12);
        assert_eq!(step_time(0.01, 10.0, -1), 0.0);
        assert_eq!(step_time(10.0, 10.0, 1), 10.0);
        assert!((step_time(5.0, f64::NAN, 1) - (5.0 + FRAME_STEP)).abs() < 1e-12);
    }

    #[test]
    fn test_rate_update() {
        assert!(needs_rate_update(1.0, 0.5));
        assert!(!needs_rate_update(1.0, 1.0));
    }
}
