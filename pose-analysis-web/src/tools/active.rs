//! Active pointer tool - a single tagged state instead of independent
//! mode flags, so at most one tool can consume a click.
//!
//! Each tool accumulates clicks and reports a completed gesture once it
//! has enough points. Measurement and annotation work in normalized
//! coordinates; angle and calibration work in canvas pixels.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Tool selector used by the host and keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    None,
    Measure,
    Annotate,
    Angle,
    Calibrate,
}

impl ToolKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(ToolKind::None),
            "measure" | "measurement" => Some(ToolKind::Measure),
            "annotate" | "annotation" => Some(ToolKind::Annotate),
            "angle" => Some(ToolKind::Angle),
            "calibrate" | "calibration" => Some(ToolKind::Calibrate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::None => "none",
            ToolKind::Measure => "measure",
            ToolKind::Annotate => "annotate",
            ToolKind::Angle => "angle",
            ToolKind::Calibrate => "calibrate",
        }
    }
}

/// A click in both coordinate spaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasClick {
    pub normalized: Point,
    pub pixel: Point,
}

/// Gesture finished by the latest click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletedGesture {
    /// Two normalized points
    Measurement([Point; 2]),
    /// One normalized point awaiting text
    Annotation(Point),
    /// Three pixel points, vertex in the middle
    Angle([Point; 3]),
    /// Two pixel points spanning the reference height
    Calibration([Point; 2]),
}

/// Current pointer tool with its pending points
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveTool {
    #[default]
    None,
    Measuring(Vec<Point>),
    Annotating,
    AnglePicking(Vec<Point>),
    Calibrating(Vec<Point>),
}

impl ActiveTool {
    pub fn from_kind(kind: ToolKind) -> Self {
        match kind {
            ToolKind::None => ActiveTool::None,
            ToolKind::Measure => ActiveTool::Measuring(Vec::with_capacity(2)),
            ToolKind::Annotate => ActiveTool::Annotating,
            ToolKind::Angle => ActiveTool::AnglePicking(Vec::with_capacity(3)),
            ToolKind::Calibrate => ActiveTool::Calibrating(Vec::with_capacity(2)),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ActiveTool::None => ToolKind::None,
            ActiveTool::Measuring(_) => ToolKind::Measure,
            ActiveTool::Annotating => ToolKind::Annotate,
            ActiveTool::AnglePicking(_) => ToolKind::Angle,
            ActiveTool::Calibrating(_) => ToolKind::Calibrate,
        }
    }

    /// Points clicked so far for the pending gesture
    pub fn pending(&self) -> &[Point] {
        match self {
            ActiveTool::Measuring(p) | ActiveTool::AnglePicking(p) | ActiveTool::Calibrating(p) => p.as_slice(),
            ActiveTool::None | ActiveTool::Annotating => &[],
        }
    }

    /// Whether pending points are in pixel space (else normalized)
    pub fn pending_in_pixels(&self) -> bool {
        matches!(self, ActiveTool::AnglePicking(_) | ActiveTool::Calibrating(_))
    }

    /// Drop pending points, keep the tool
    pub fn reset_pending(&mut self) {
        if let ActiveTool::Measuring(p) | ActiveTool::AnglePicking(p) | ActiveTool::Calibrating(p) = self {
            p.clear();
        }
    }

    /// Feed one click. Returns the finished gesture, if any. Measuring and
    /// angle picking stay active with an empty accumulator afterwards;
    /// calibration exits to `None`.
    pub fn click(&mut self, click: CanvasClick) -> Option<CompletedGesture> {
        match self {
            ActiveTool::None => None,
            ActiveTool::Annotating => Some(CompletedGesture::Annotation(click.normalized)),
            ActiveTool::Measuring(pending) => {
                pending.push(click.normalized);
                if pending.len() < 2 {
                    return None;
                }
                let gesture = CompletedGesture::Measurement([pending[0], pending[1]]);
                pending.clear();
                Some(gesture)
            }
            ActiveTool::AnglePicking(pending) => {
                pending.push(click.pixel);
                if pending.len() < 3 {
                    return None;
                }
                let gesture = CompletedGesture::Angle([pending[0], pending[1], pending[2]]);
                pending.clear();
                Some(gesture)
            }
            ActiveTool::Calibrating(pending) => {
                pending.push(click.pixel);
                if pending.len() < 2 {
                    return None;
                }
                let gesture = CompletedGesture::Calibration([pending[0], pending[1]]);
                *self = ActiveTool::None;
                Some(gesture)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(x: f64, y: f64) -> CanvasClick {
        CanvasClick {
            normalized: Point::new(x, y),
            pixel: Point::new(x * 100.0, y * 200.0),
        }
    }

    #[test]
    fn test_measurement_two_clicks() {
        let mut tool = ActiveTool::from_kind(ToolKind::Measure);
        assert_eq!(tool.click(click(0.1, 0.1)), None);
        assert_eq!(tool.pending().len(), 1);
        let done = tool.click(click(0.2, 0.3));
        assert_eq!(
            done,
            Some(CompletedGesture::Measurement([Point::new(0.1, 0.1), Point::new(0.2, 0.3)]))
        );
        assert!(tool.pending().is_empty());

        // third click starts a new pending measurement
        assert_eq!(tool.click(click(0.5, 0.5)), None);
        assert_eq!(tool.pending(), &[Point::new(0.5, 0.5)]);
        assert_eq!(tool.kind(), ToolKind::Measure);
    }

    #[test]
    fn test_angle_uses_pixels() {
        let mut tool = ActiveTool::from_kind(ToolKind::Angle);
        assert!(tool.click(click(0.1, 0.1)).is_none());
        assert!(tool.click(click(0.2, 0.1)).is_none());
        match tool.click(click(0.2, 0.2)) {
            Some(CompletedGesture::Angle(points)) => {
                assert_eq!(points[1], Point::new(20.0, 20.0));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(tool.pending().is_empty());
        assert_eq!(tool.kind(), ToolKind::Angle);
    }

    #[test]
    fn test_calibration_exits() {
        let mut tool = ActiveTool::from_kind(ToolKind::Calibrate);
        assert!(tool.click(click(0.5, 0.2)).is_none());
        assert!(matches!(tool.click(click(0.5, 0.8)), Some(CompletedGesture::Calibration(_))));
        assert_eq!(tool, ActiveTool::None);
    }

    #[test]
    fn test_annotation_and_none() {
        let mut tool = ActiveTool::from_kind(ToolKind::Annotate);
        assert_eq!(
            tool.click(click(0.4, 0.6)),
            Some(CompletedGesture::Annotation(Point::new(0.4, 0.6)))
        );
        let mut idle = ActiveTool::None;
        assert_eq!(idle.click(click(0.4, 0.6)), None);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(ToolKind::parse("Measure"), Some(ToolKind::Measure));
        assert_eq!(ToolKind::parse("calibration"), Some(ToolKind::Calibrate));
        assert_eq!(ToolKind::parse("lasso"), None);
        for kind in [ToolKind::None, ToolKind::Measure, ToolKind::Annotate, ToolKind::Angle, ToolKind::Calibrate] {
            assert_eq!(ToolKind::parse(kind.as_str()), Some(kind));
        }
    }
}
