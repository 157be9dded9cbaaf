//! Pixel ↔ meter conversion
//!
//! `PixelScale` holds the session's pixels-per-meter. It starts from a
//! coarse heuristic at video load and is only refined by explicit
//! two-point calibration against a known reference height.

use serde::{Deserialize, Serialize};

use super::point::{pixel_distance, Point};

/// Default reference height for calibration (meters)
pub const DEFAULT_REFERENCE_HEIGHT: f64 = 1.75;

/// Fraction of the frame height the subject is assumed to occupy
pub const SUBJECT_FRAME_FRACTION: f64 = 0.25;

/// Scale used before any video metadata is known
pub const DEFAULT_PIXELS_PER_METER: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelScale {
    pixels_per_meter: f64,
}

impl PixelScale {
    pub fn new(pixels_per_meter: f64) -> Self {
        if pixels_per_meter.is_finite() && pixels_per_meter > 0.0 {
            Self { pixels_per_meter }
        } else {
            Self::default()
        }
    }

    /// Initial estimate from native video height: a subject of
    /// `reference_height` meters spans a quarter of the frame.
    pub fn from_video_height(video_height: f64, reference_height: f64) -> Self {
        if reference_height <= 0.0 {
            return Self::default();
        }
        Self::new(video_height * SUBJECT_FRAME_FRACTION / reference_height)
    }

    pub fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    /// Set scale from two pixel-space points spanning `reference_height`
    /// meters. Returns the new pixels-per-meter, or `None` (scale left
    /// untouched) when the points coincide or the height is invalid.
    pub fn calibrate(&mut self, p1: Point, p2: Point, reference_height: f64) -> Option<f64> {
        let distance = pixel_distance(p1, p2);
        if !(reference_height.is_finite() && reference_height > 0.0) || distance <= 0.0 {
            return None;
        }
        self.pixels_per_meter = distance / reference_height;
        Some(self.pixels_per_meter)
    }

    /// Unrounded meters for a pixel length
    pub fn meters(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_meter
    }

    /// Meters rounded to 3 decimals (display value)
    pub fn convert_pixels_to_meters(&self, pixels: f64) -> f64 {
        round_to(self.meters(pixels), 3)
    }
}

impl Default for PixelScale {
    fn default() -> Self {
        Self { pixels_per_meter: DEFAULT_PIXELS_PER_METER }
    }
}

/// Round to a fixed number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_scenario() {
        // (0.5, 0.2) and (0.5, 0.8) on a 400x800 canvas
        let mut scale = PixelScale::default();
        let ppm = scale
            .calibrate(Point::new(200.0, 160.0), Point::new(200.0, 640.0), 1.75)
            .unwrap();
        assert!((ppm - 480.0 / 1.75).abs() < 1e-9);
        assert!((ppm - 274.29).abs() < 0.01);
    }

    #[test]
    fn test_calibration_roundtrip() {
        let mut scale = PixelScale::default();
        let p1 = Point::new(13.0, 40.0);
        let p2 = Point::new(310.5, 522.25);
        let d = pixel_distance(p1, p2);
        scale.calibrate(p1, p2, 1.82).unwrap();
        assert!((scale.convert_pixels_to_meters(d) - 1.82).abs() <= 0.001);
    }

    #[test]
    fn test_degenerate_calibration_keeps_scale() {
        let mut scale = PixelScale::new(250.0);
        let p = Point::new(5.0, 5.0);
        assert_eq!(scale.calibrate(p, p, 1.75), None);
        assert_eq!(scale.calibrate(p, Point::new(5.0, 50.0), 0.0), None);
        assert_eq!(scale.pixels_per_meter(), 250.0);
    }

    #[test]
    fn test_video_heuristic() {
        let scale = PixelScale::from_video_height(1080.0, 1.75);
        assert!((scale.pixels_per_meter() - 270.0 / 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_rounding() {
        let scale = PixelScale::new(300.0);
        assert_eq!(scale.convert_pixels_to_meters(100.0), 0.333);
        assert_eq!(round_to(1.23456, 2), 1.23);
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        assert_eq!(PixelScale::new(f64::NAN), PixelScale::default());
        assert_eq!(PixelScale::new(-3.0), PixelScale::default());
    }
}
