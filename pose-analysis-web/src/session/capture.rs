//! Captured frames - rasterized image plus a deep copy of the overlay
//! state at that instant, kept in a bounded FIFO list

use std::collections::VecDeque;

use serde::Serialize;
use uuid::Uuid;

use crate::config::OverlaySettings;
use crate::pose::PoseFrame;
use crate::tools::{AngleMeasurement, Annotation, MeasurementSummary};

/// Oldest capture is evicted beyond this
pub const MAX_CAPTURES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedFrame {
    pub id: String,
    /// Video time (seconds)
    pub time: f64,
    pub name: String,
    pub notes: String,
    /// `data:` URL of the rasterized frame
    pub image_data: String,
    pub pose_data: Option<PoseFrame>,
    pub measurements: Vec<MeasurementSummary>,
    pub annotations: Vec<Annotation>,
    pub angles: Vec<AngleMeasurement>,
    pub settings: OverlaySettings,
}

/// State copied into a capture
pub struct CaptureContent {
    pub time: f64,
    pub image_data: String,
    pub pose_data: Option<PoseFrame>,
    pub measurements: Vec<MeasurementSummary>,
    pub annotations: Vec<Annotation>,
    pub angles: Vec<AngleMeasurement>,
    pub settings: OverlaySettings,
}

impl CapturedFrame {
    /// A blank name becomes "Frame at {time}s"
    pub fn new(name: &str, notes: &str, content: CaptureContent) -> Self {
        let name = match name.trim() {
            "" => format!("Frame at {:.2}s", content.time),
            n => n.to_string(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            time: content.time,
            name,
            notes: notes.trim().to_string(),
            image_data: content.image_data,
            pose_data: content.pose_data,
            measurements: content.measurements,
            annotations: content.annotations,
            angles: content.angles,
            settings: content.settings,
        }
    }
}

/// Insertion-ordered, capped at `MAX_CAPTURES`. Reading never reorders.
#[derive(Debug, Default)]
pub struct CaptureList {
    frames: VecDeque<CapturedFrame>,
}

impl CaptureList {
    /// Append; returns the evicted capture when the list was full
    pub fn push(&mut self, frame: CapturedFrame) -> Option<CapturedFrame> {
        self.frames.push_back(frame);
        if self.frames.len() > MAX_CAPTURES {
            let evicted = self.frames.pop_front();
            if let Some(e) = &evicted {
                log::debug!("capture list full, evicted {}", e.id);
            }
            return evicted;
        }
        None
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.frames.len();
        self.frames.retain(|f| f.id != id);
        self.frames.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapturedFrame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
