//! Two-point distance measurements
//!
//! Points are stored normalized; pixel and metric lengths are derived at
//! read time so they always reflect the current canvas size and scale.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{normalized_segment_pixels, round_to, CanvasSize, PixelScale, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,
    pub points: [Point; 2],
    /// Video time (seconds) when committed
    pub timestamp: f64,
}

impl Measurement {
    pub fn new(points: [Point; 2], timestamp: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            points,
            timestamp,
        }
    }

    pub fn pixel_length(&self, size: CanvasSize) -> f64 {
        normalized_segment_pixels(self.points[0], self.points[1], size)
    }

    pub fn summarize(&self, size: CanvasSize, scale: &PixelScale) -> MeasurementSummary {
        let pixels = self.pixel_length(size);
        MeasurementSummary {
            measurement: self.clone(),
            distance_pixels: round_to(pixels, 1),
            distance_meters: scale.convert_pixels_to_meters(pixels),
        }
    }
}

/// Measurement plus lengths under the current scale
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSummary {
    #[serde(flatten)]
    pub measurement: Measurement,
    pub distance_pixels: f64,
    pub distance_meters: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_length_uses_current_scale() {
        let size = CanvasSize::new(400.0, 800.0);
        let m = Measurement::new([Point::new(0.5, 0.2), Point::new(0.5, 0.8)], 1.25);
        assert!((m.pixel_length(size) - 480.0).abs() < 1e-9);

        let mut scale = PixelScale::new(100.0);
        assert_eq!(m.summarize(size, &scale).distance_meters, 4.8);

        scale.calibrate(Point::new(0.0, 0.0), Point::new(0.0, 480.0), 1.75);
        assert_eq!(m.summarize(size, &scale).distance_meters, 1.75);
    }

    #[test]
    fn test_ids_unique() {
        let a = Measurement::new([Point::default(), Point::new(1.0, 1.0)], 0.0);
        let b = Measurement::new([Point::default(), Point::new(1.0, 1.0)], 0.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_summary_serializes_flat() {
        let m = Measurement::new([Point::new(0.0, 0.0), Point::new(0.5, 0.0)], 2.0);
        let json = serde_json::to_value(m.summarize(CanvasSize::new(200.0, 100.0), &PixelScale::new(50.0))).unwrap();
        assert_eq!(json["distanceMeters"], 2.0);
        assert_eq!(json["timestamp"], 2.0);
        assert!(json["id"].is_string());
    }
}
