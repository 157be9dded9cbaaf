//! Scene assembly - stacks the layers for one tick in draw order:
//! skeleton, trajectories, measurements, annotations, angles, tool
//! preview, magnifier

use super::magnifier::build_magnifier_ops;
use super::overlays::{
    build_angle_ops, build_annotation_ops, build_measurement_ops, build_pending_ops, build_tool_hint_ops,
};
use super::shapes::DrawOp;
use super::skeleton::{build_skeleton_ops, SkeletonStyle};
use super::trajectory::build_trajectory_ops;
use crate::config::{AnalysisMode, OverlaySettings};
use crate::geometry::{CanvasSize, PixelScale, Point};
use crate::pose::PoseFrame;
use crate::tools::{ActiveTool, AngleMeasurement, Annotation, Measurement};
use crate::tracking::TrajectoryTracker;

/// Everything one tick draws, borrowed from the session
pub struct Scene<'a> {
    /// Matched pose frame; `None` skips the skeleton only
    pub frame: Option<&'a PoseFrame>,
    pub settings: &'a OverlaySettings,
    pub size: CanvasSize,
    pub scale: &'a PixelScale,
    pub trajectories: &'a TrajectoryTracker,
    pub measurements: &'a [Measurement],
    pub annotations: &'a [Annotation],
    /// Automatic and user-defined angles, already merged
    pub angles: &'a [AngleMeasurement],
    pub tool: &'a ActiveTool,
    pub selected: Option<usize>,
    /// Pointer position in canvas pixels
    pub pointer: Option<Point>,
}

pub fn build_scene(scene: &Scene) -> Vec<DrawOp> {
    let settings = scene.settings;
    let mut ops = Vec::new();

    if let Some(frame) = scene.frame {
        let style = SkeletonStyle::from_settings(settings, scene.selected);
        ops.extend(build_skeleton_ops(frame, &style, scene.size));
    }

    if settings.show_trajectories || settings.mode == AnalysisMode::Trajectory {
        ops.extend(build_trajectory_ops(scene.trajectories, scene.size, settings.show_trajectory_points));
    }
    if settings.show_measurements {
        ops.extend(build_measurement_ops(scene.measurements, scene.size, scene.scale));
    }
    if settings.show_annotations {
        ops.extend(build_annotation_ops(scene.annotations, scene.size));
    }
    if settings.show_angles {
        ops.extend(build_angle_ops(scene.angles));
    }

    ops.extend(build_pending_ops(scene.tool, scene.size));
    ops.extend(build_tool_hint_ops(scene.tool, settings.reference_height));

    // last, so the inset samples every layer above
    ops.extend(build_magnifier_ops(settings, scene.pointer, scene.size));
    ops
}
