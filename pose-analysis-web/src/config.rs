//! Overlay settings
//!
//! Received from the host as a plain JS object. Every field has a
//! default; numeric values outside their range are clamped and invalid
//! colors fall back to the default instead of being rejected.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::geometry::DEFAULT_REFERENCE_HEIGHT;
use crate::pose::KeypointGroup;
use crate::style::sanitize_color;
use crate::tracking::{clamp_length, DEFAULT_TRAJECTORY_LENGTH};

/// What subset of the pose overlay is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisMode {
    #[default]
    Full,
    Skeleton,
    /// Path history only, no skeleton
    Trajectory,
    /// Only the active keypoint group, drawn larger
    Focus,
}

/// Raster quality tier for frame captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureQuality {
    #[default]
    High,
    Medium,
    Low,
}

impl CaptureQuality {
    /// Fraction of native video resolution
    pub fn scale(&self) -> f64 {
        match self {
            CaptureQuality::High => 1.0,
            CaptureQuality::Medium => 0.75,
            CaptureQuality::Low => 0.5,
        }
    }

    /// JPEG encoder quality
    pub fn encoder_quality(&self) -> f64 {
        match self {
            CaptureQuality::High => 0.95,
            CaptureQuality::Medium => 0.85,
            CaptureQuality::Low => 0.7,
        }
    }
}

mod defaults {
    pub const KEYPOINT_COLOR: &str = "#00ff00";
    pub const CONNECTION_COLOR: &str = "#ffffff";
    pub const HIGHLIGHT_COLOR: &str = "#ff6b6b";
    pub const SELECTED_COLOR: &str = "#ffd93d";
    pub const ANNOTATION_COLOR: &str = "#ffff00";
    pub const MIN_CONFIDENCE: f64 = 0.4;
    pub const ANNOTATION_SIZE: f64 = 16.0;
    pub const MAGNIFIER_ZOOM: f64 = 3.0;
    pub const MAGNIFIER_SIZE: f64 = 180.0;
}

/// All user-adjustable overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlaySettings {
    pub mode: AnalysisMode,
    pub focus_group: Option<KeypointGroup>,
    pub min_confidence: f64,
    pub show_keypoint_indices: bool,
    pub show_trajectories: bool,
    pub show_trajectory_points: bool,
    pub trajectory_length: usize,
    pub show_angles: bool,
    pub show_measurements: bool,
    pub show_annotations: bool,
    pub keypoint_color: String,
    pub connection_color: String,
    pub highlight_color: String,
    pub selected_color: String,
    pub annotation_color: String,
    pub annotation_size: f64,
    pub reference_height: f64,
    pub magnifier_enabled: bool,
    pub magnifier_zoom: f64,
    pub magnifier_size: f64,
    pub magnifier_follow_mouse: bool,
    pub magnifier_grid: bool,
    pub magnifier_crosshair: bool,
    pub capture_quality: CaptureQuality,
    pub capture_include_overlay: bool,
    pub playback_rate: f64,
    pub touch_device: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Full,
            focus_group: None,
            min_confidence: defaults::MIN_CONFIDENCE,
            show_keypoint_indices: false,
            show_trajectories: true,
            show_trajectory_points: true,
            trajectory_length: DEFAULT_TRAJECTORY_LENGTH,
            show_angles: true,
            show_measurements: true,
            show_annotations: true,
            keypoint_color: defaults::KEYPOINT_COLOR.to_string(),
            connection_color: defaults::CONNECTION_COLOR.to_string(),
            highlight_color: defaults::HIGHLIGHT_COLOR.to_string(),
            selected_color: defaults::SELECTED_COLOR.to_string(),
            annotation_color: defaults::ANNOTATION_COLOR.to_string(),
            annotation_size: defaults::ANNOTATION_SIZE,
            reference_height: DEFAULT_REFERENCE_HEIGHT,
            magnifier_enabled: false,
            magnifier_zoom: defaults::MAGNIFIER_ZOOM,
            magnifier_size: defaults::MAGNIFIER_SIZE,
            magnifier_follow_mouse: true,
            magnifier_grid: true,
            magnifier_crosshair: true,
            capture_quality: CaptureQuality::High,
            capture_include_overlay: true,
            playback_rate: 1.0,
            touch_device: false,
        }
    }
}

impl OverlaySettings {
    /// Parse from JSON text and sanitize
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let settings: OverlaySettings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Overlay the fields present in `patch` (a camelCase object) on a
    /// copy of these settings. Absent fields keep their current value.
    pub fn merged(&self, patch: serde_json::Value) -> Result<Self, AnalysisError> {
        let serde_json::Value::Object(patch) = patch else {
            return Err(AnalysisError::Serialization("settings patch must be an object".into()));
        };
        let mut current = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut current {
            fields.extend(patch);
        }
        let settings: OverlaySettings = serde_json::from_value(current)?;
        Ok(settings.sanitized())
    }

    /// Clamp numeric ranges and replace unparseable colors
    pub fn sanitized(mut self) -> Self {
        self.min_confidence = clamp_or(self.min_confidence, 0.0, 1.0, defaults::MIN_CONFIDENCE);
        self.trajectory_length = clamp_length(self.trajectory_length);
        self.annotation_size = clamp_or(self.annotation_size, 10.0, 48.0, defaults::ANNOTATION_SIZE);
        self.magnifier_zoom = clamp_or(self.magnifier_zoom, 1.5, 10.0, defaults::MAGNIFIER_ZOOM);
        self.magnifier_size = clamp_or(self.magnifier_size, 100.0, 300.0, defaults::MAGNIFIER_SIZE);
        self.playback_rate = clamp_or(self.playback_rate, 0.1, 2.0, 1.0);
        if !(self.reference_height.is_finite() && self.reference_height > 0.0) {
            self.reference_height = DEFAULT_REFERENCE_HEIGHT;
        }

        self.keypoint_color = sanitize_color(&self.keypoint_color, defaults::KEYPOINT_COLOR);
        self.connection_color = sanitize_color(&self.connection_color, defaults::CONNECTION_COLOR);
        self.highlight_color = sanitize_color(&self.highlight_color, defaults::HIGHLIGHT_COLOR);
        self.selected_color = sanitize_color(&self.selected_color, defaults::SELECTED_COLOR);
        self.annotation_color = sanitize_color(&self.annotation_color, defaults::ANNOTATION_COLOR);
        self
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let current = OverlaySettings::from_json(
            r##"{"magnifierEnabled": true, "trajectoryLength": 30, "keypointColor": "#123456"}"##,
        )
        .unwrap();

        let updated = current.merged(serde_json::json!({ "playbackRate": 0.5 })).unwrap();
        assert_eq!(updated.playback_rate, 0.5);
        assert!(updated.magnifier_enabled);
        assert_eq!(updated.trajectory_length, 30);
        assert_eq!(updated.keypoint_color, "#123456");

        let clamped = updated.merged(serde_json::json!({ "playbackRate": 8.0 })).unwrap();
        assert_eq!(clamped.playback_rate, 2.0);
        assert!(current.merged(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_defaults_from_empty_object() {
        let settings = OverlaySettings::from_json("{}").unwrap();
        assert_eq!(settings, OverlaySettings::default());
        assert_eq!(settings.trajectory_length, 50);
        assert_eq!(settings.min_confidence, 0.4);
        assert_eq!(settings.reference_height, 1.75);
    }

    #[test]
    fn test_ranges_clamped() {
        let settings = OverlaySettings::from_json(
            r#"{"trajectoryLength": 500, "magnifierZoom": 0.2, "magnifierSize": 900,
                "playbackRate": 8, "minConfidence": -1, "referenceHeight": 0}"#,
        )
        .unwrap();
        assert_eq!(settings.trajectory_length, 200);
        assert_eq!(settings.magnifier_zoom, 1.5);
        assert_eq!(settings.magnifier_size, 300.0);
        assert_eq!(settings.playback_rate, 2.0);
        assert_eq!(settings.min_confidence, 0.0);
        assert_eq!(settings.reference_height, 1.75);
    }

    #[test]
    fn test_invalid_colors_replaced() {
        let settings = OverlaySettings::from_json(
            r##"{"keypointColor": "rgb(1,2,3)80", "highlightColor": "#abc"}"##,
        )
        .unwrap();
        assert_eq!(settings.keypoint_color, "#00ff00");
        assert_eq!(settings.highlight_color, "#abc");
    }

    #[test]
    fn test_enum_names() {
        let settings = OverlaySettings::from_json(
            r#"{"mode": "focus", "focusGroup": "leftLeg", "captureQuality": "low"}"#,
        )
        .unwrap();
        assert_eq!(settings.mode, AnalysisMode::Focus);
        assert_eq!(settings.focus_group, Some(KeypointGroup::LeftLeg));
        assert_eq!(settings.capture_quality, CaptureQuality::Low);
        assert!(OverlaySettings::from_json(r#"{"mode": "wireframe"}"#).is_err());
    }
}
