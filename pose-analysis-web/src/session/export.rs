//! Analysis export document
//!
//! Measurements carry metric distances computed at export time from the
//! current scale. Capture images are truncated so the document stays
//! small; the full images only live in-session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::capture::CapturedFrame;
use crate::config::OverlaySettings;
use crate::error::AnalysisError;
use crate::pose::PoseSequence;
use crate::tools::{AngleMeasurement, Annotation, MeasurementSummary};

/// Characters of each capture's image data kept in the export
pub const IMAGE_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationInfo {
    pub pixels_per_meter: f64,
    pub reference_height: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument<'a> {
    pub video_id: &'a str,
    /// Opaque host metadata, passed through untouched
    pub video_metadata: serde_json::Value,
    pub exported_at: DateTime<Utc>,
    pub pose_data: &'a PoseSequence,
    pub measurements: Vec<MeasurementSummary>,
    pub annotations: &'a [Annotation],
    pub angles: &'a [AngleMeasurement],
    pub captured_frames: Vec<CapturedFrame>,
    pub calibration: CalibrationInfo,
    pub settings: &'a OverlaySettings,
}

impl AnalysisDocument<'_> {
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `analisis_<videoId>_<epoch millis>.json`
    pub fn file_name(&self) -> String {
        export_file_name(self.video_id, self.exported_at)
    }
}

pub fn export_file_name(video_id: &str, at: DateTime<Utc>) -> String {
    format!("analisis_{}_{}.json", video_id, at.timestamp_millis())
}

/// Copy of `frame` with the image payload cut to a short prefix
pub fn truncate_image(frame: &CapturedFrame) -> CapturedFrame {
    let mut out = frame.clone();
    if let Some((cut, _)) = out.image_data.char_indices().nth(IMAGE_PREVIEW_CHARS) {
        out.image_data.truncate(cut);
        out.image_data.push_str("...");
    }
    out
}
