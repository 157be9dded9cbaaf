//! Trajectory rendering - fading path per tracked joint

use super::shapes::{circle, DrawOp, Paint};
use crate::geometry::CanvasSize;
use crate::style::{rotated_hue, with_alpha};
use crate::tracking::TrajectoryTracker;

const PATH_WIDTH: f64 = 2.5;
const POINT_RADIUS: f64 = 2.5;

/// One polyline per joint with at least two positions, stroked with a
/// gradient from transparent (oldest) to opaque (newest). Optional dots
/// grow more opaque toward the newest position.
pub fn build_trajectory_ops(tracker: &TrajectoryTracker, size: CanvasSize, show_points: bool) -> Vec<DrawOp> {
    let mut ops = Vec::new();

    for (slot, _joint, ring) in tracker.iter() {
        if ring.is_empty() {
            continue;
        }
        let color = rotated_hue(slot);
        let points: Vec<_> = ring.iter().map(|p| p.to_pixels(size)).collect();

        if points.len() >= 2 {
            let stroke = Paint::Linear {
                from: points[0],
                to: points[points.len() - 1],
                stops: vec![(0.0, with_alpha(&color, 0.0)), (1.0, with_alpha(&color, 1.0))],
            };
            ops.push(DrawOp::Polyline { points: points.clone(), stroke, width: PATH_WIDTH });
        }

        if show_points {
            let n = points.len() as f64;
            for (i, p) in points.iter().enumerate() {
                let alpha = (i as f64 + 1.0) / n;
                ops.push(circle(*p, POINT_RADIUS, Paint::Solid(with_alpha(&color, alpha))));
            }
        }
    }

    ops
}
