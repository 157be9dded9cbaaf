//! Draw primitives - the display list handed to the canvas painter
//!
//! Layer builders produce `Vec<DrawOp>` from plain data; only the
//! painter touches the canvas. All coordinates are canvas pixels.

use crate::geometry::Point;

/// How a shape is filled or stroked
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(String),
    /// Radial gradient centered on the shape: `inner` at the center,
    /// `outer` at the rim
    Radial { inner: String, outer: String },
    /// Linear gradient from `from` to `to` with (offset, color) stops
    Linear { from: Point, to: Point, stops: Vec<(f64, String)> },
}

impl Paint {
    pub fn solid(color: &str) -> Self {
        Paint::Solid(color.to_string())
    }

    /// Flat color used when gradient construction fails
    pub fn fallback_color(&self) -> &str {
        match self {
            Paint::Solid(c) => c,
            Paint::Radial { inner, .. } => inner,
            Paint::Linear { stops, .. } => stops.last().map(|(_, c)| c.as_str()).unwrap_or("#ffffff"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Circular zoom inset, resolved to source/destination rectangles
#[derive(Debug, Clone, PartialEq)]
pub struct MagnifierView {
    /// Region of the video/overlay to sample (pixels, clamped to canvas)
    pub source: Rect,
    /// Center of the inset on the canvas
    pub center: Point,
    /// Inset diameter (pixels)
    pub size: f64,
    pub zoom: f64,
    pub grid: bool,
    pub crosshair: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Circle { center: Point, radius: f64, fill: Paint },
    Ring { center: Point, radius: f64, color: String, width: f64 },
    Line { from: Point, to: Point, stroke: Paint, width: f64 },
    Polyline { points: Vec<Point>, stroke: Paint, width: f64 },
    /// Arc stroke from `start` to `end` radians (clockwise on screen)
    Arc { center: Point, radius: f64, start: f64, end: f64, color: String, width: f64 },
    Text { at: Point, text: String, color: String, font: String, align: TextAlign },
    /// Text on a translucent backdrop for legibility over video
    Label { at: Point, text: String, color: String, background: String, font: String },
    Magnifier(MagnifierView),
}

// ============================================================================
// BUILDERS
// ============================================================================

pub fn circle(center: Point, radius: f64, fill: Paint) -> DrawOp {
    DrawOp::Circle { center, radius, fill }
}

pub fn line(from: Point, to: Point, color: &str, width: f64) -> DrawOp {
    DrawOp::Line { from, to, stroke: Paint::solid(color), width }
}

pub fn label(at: Point, text: impl Into<String>, color: &str, font_px: f64) -> DrawOp {
    DrawOp::Label {
        at,
        text: text.into(),
        color: color.to_string(),
        background: "rgba(0, 0, 0, 0.6)".to_string(),
        font: font(font_px, true),
    }
}

/// CSS font shorthand
pub fn font(px: f64, bold: bool) -> String {
    if bold {
        format!("bold {}px sans-serif", px.round())
    } else {
        format!("{}px sans-serif", px.round())
    }
}
