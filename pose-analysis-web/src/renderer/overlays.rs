//! Overlay rendering - measurements, annotations, angles and pending
//! tool clicks

use super::shapes::{circle, label, line, DrawOp, Paint};
use crate::geometry::{arc_span, CanvasSize, PixelScale, Point};
use crate::style::with_alpha;
use crate::tools::{ActiveTool, AngleMeasurement, Annotation, Measurement};

/// Colors for tool overlays
mod colors {
    pub const MEASUREMENT: &str = "#00d4ff";
    pub const PENDING: &str = "#ffffff";
    pub const CALIBRATION: &str = "#ff9f43";
    pub const LABEL_TEXT: &str = "#ffffff";
}

const MEASUREMENT_WIDTH: f64 = 2.0;
const ENDPOINT_RADIUS: f64 = 4.0;
const PENDING_RADIUS: f64 = 6.0;
const ANGLE_ARM_WIDTH: f64 = 2.0;
const ANGLE_ARC_RADIUS: f64 = 30.0;
const LABEL_FONT_PX: f64 = 13.0;

/// Line with end markers and a metric label at the midpoint. The label
/// uses `scale` as it is now, not as it was when the line was drawn.
pub fn build_measurement_ops(measurements: &[Measurement], size: CanvasSize, scale: &PixelScale) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(measurements.len() * 4);

    for m in measurements {
        let a = m.points[0].to_pixels(size);
        let b = m.points[1].to_pixels(size);
        ops.push(line(a, b, colors::MEASUREMENT, MEASUREMENT_WIDTH));
        ops.push(circle(a, ENDPOINT_RADIUS, Paint::solid(colors::MEASUREMENT)));
        ops.push(circle(b, ENDPOINT_RADIUS, Paint::solid(colors::MEASUREMENT)));

        let meters = scale.convert_pixels_to_meters(m.pixel_length(size));
        ops.push(label(a.midpoint(&b).offset(0.0, -10.0), format!("{:.3} m", meters), colors::MEASUREMENT, LABEL_FONT_PX));
    }

    ops
}

pub fn build_annotation_ops(annotations: &[Annotation], size: CanvasSize) -> Vec<DrawOp> {
    annotations
        .iter()
        .map(|a| label(a.position().to_pixels(size), a.text.clone(), &a.color, a.size))
        .collect()
}

/// Both arms, a translucent arc at the vertex, and the degree label.
/// Angle points are already in canvas pixels.
pub fn build_angle_ops(angles: &[AngleMeasurement]) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(angles.len() * 4);

    for angle in angles {
        let [a, vertex, c] = angle.points;
        ops.push(line(vertex, a, &angle.color, ANGLE_ARM_WIDTH));
        ops.push(line(vertex, c, &angle.color, ANGLE_ARM_WIDTH));

        let (start, end) = arc_span(a, vertex, c);
        ops.push(DrawOp::Arc {
            center: vertex,
            radius: ANGLE_ARC_RADIUS,
            start,
            end,
            color: with_alpha(&angle.color, 0.5),
            width: ANGLE_ARM_WIDTH,
        });

        ops.push(label(
            vertex.offset(ANGLE_ARC_RADIUS + 6.0, -ANGLE_ARC_RADIUS / 2.0),
            angle.label(),
            &angle.color,
            LABEL_FONT_PX,
        ));
    }

    ops
}

/// Markers for clicks accumulated by the active tool. Measurement
/// pending points are normalized; angle and calibration points are
/// already pixels.
pub fn build_pending_ops(tool: &ActiveTool, size: CanvasSize) -> Vec<DrawOp> {
    let color = match tool {
        ActiveTool::Calibrating(_) => colors::CALIBRATION,
        _ => colors::PENDING,
    };

    let to_pixels = |p: &Point| if tool.pending_in_pixels() { *p } else { p.to_pixels(size) };
    let points: Vec<Point> = tool.pending().iter().map(to_pixels).collect();

    let mut ops: Vec<DrawOp> = points
        .windows(2)
        .map(|w| DrawOp::Line {
            from: w[0],
            to: w[1],
            stroke: Paint::solid(&with_alpha(color, 0.6)),
            width: 1.5,
        })
        .collect();

    for p in &points {
        ops.push(DrawOp::Ring { center: *p, radius: PENDING_RADIUS, color: color.to_string(), width: 2.0 });
        ops.push(circle(*p, 2.0, Paint::solid(color)));
    }

    ops
}

/// Label shown while calibrating so the user knows what the clicks mean
pub fn build_tool_hint_ops(tool: &ActiveTool, reference_height: f64) -> Vec<DrawOp> {
    let text = match tool {
        ActiveTool::Calibrating(p) => format!("Calibrate: click {} of 2 ({:.2} m)", p.len() + 1, reference_height),
        ActiveTool::AnglePicking(p) => format!("Angle: click {} of 3", p.len() + 1),
        ActiveTool::Measuring(p) => format!("Measure: click {} of 2", p.len() + 1),
        ActiveTool::Annotating => "Annotate: click to place text".to_string(),
        ActiveTool::None => return Vec::new(),
    };
    vec![label(Point::new(10.0, 20.0), text, colors::LABEL_TEXT, LABEL_FONT_PX)]
}
