//! 2D point and canvas-space conversions

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A 2D point. Depending on context either normalized (0-1 image
/// fraction) or canvas pixels; the owning type documents which.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Normalized → canvas pixels
    pub fn to_pixels(&self, size: CanvasSize) -> Point {
        Point::new(self.x * size.width, self.y * size.height)
    }

    /// Canvas pixels → normalized
    pub fn to_normalized(&self, size: CanvasSize) -> Point {
        if size.is_empty() {
            return Point::default();
        }
        Point::new(self.x / size.width, self.y / size.height)
    }

    /// Clamp both coordinates into [0, 1]
    pub fn clamp_unit(&self) -> Point {
        Point::new(clamp_unit(self.x), clamp_unit(self.y))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Canvas pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}

/// Clamp into [0, 1]; NaN maps to 0
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Client (viewport) coordinates → normalized position inside a
/// bounding rect. `None` when the rect has no area.
pub fn normalize_in_rect(client_x: f64, client_y: f64, left: f64, top: f64, width: f64, height: f64) -> Option<Point> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    Some(Point::new((client_x - left) / width, (client_y - top) / height))
}

/// Euclidean distance between two pixel-space points
pub fn pixel_distance(a: Point, b: Point) -> f64 {
    a.distance_to(&b)
}

/// Pixel length of a segment given in normalized coordinates
pub fn normalized_segment_pixels(a: Point, b: Point, size: CanvasSize) -> f64 {
    pixel_distance(a.to_pixels(size), b.to_pixels(size))
}
