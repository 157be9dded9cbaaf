//! Error taxonomy for the analysis engine
//!
//! Missing or low-confidence pose data is NOT an error: those cases are
//! modelled as `Option` and simply skipped by the renderer.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced to the host page
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Video failed to load or decode
    #[error("media error: {0}")]
    Media(String),

    /// Canvas or 2D context could not be obtained or used
    #[error("canvas error: {0}")]
    Canvas(String),

    /// Pose feed was malformed (wrong keypoint count, non-finite time, ...)
    #[error("invalid pose data: {0}")]
    InvalidPoseData(String),

    /// Settings or export document could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Browser platform API failed (fullscreen, download, ...)
    #[error("platform error: {0}")]
    Platform(String),

    /// Video metadata has not been loaded yet
    #[error("video dimensions are not available yet")]
    NoVideoDimensions,
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Serialization(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for AnalysisError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        AnalysisError::Serialization(err.to_string())
    }
}

impl From<AnalysisError> for JsValue {
    fn from(err: AnalysisError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Describe a JS exception for logging
pub fn describe_js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
