//! Renderer module - display-list builders and the 2D canvas painter
//!
//! Re-exports only. All logic in submodules.

mod canvas;
mod magnifier;
mod overlays;
mod scene;
mod shapes;
mod skeleton;
mod trajectory;

pub use canvas::CanvasPainter;
pub use magnifier::{build_magnifier_ops, source_rect};
pub use overlays::{
    build_angle_ops, build_annotation_ops, build_measurement_ops, build_pending_ops, build_tool_hint_ops,
};
pub use scene::{build_scene, Scene};
pub use shapes::{circle, font, label, line, DrawOp, MagnifierView, Paint, Rect, TextAlign};
pub use skeleton::{build_skeleton_ops, SkeletonStyle, INDEX_LABEL_MIN_CONFIDENCE};
pub use trajectory::build_trajectory_ops;
