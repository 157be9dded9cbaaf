//! Tools module - pointer interaction state machines and the items
//! they commit (measurements, annotations, angles)
//!
//! Re-exports only. All logic in submodules.

mod active;
mod angle;
mod annotation;
mod measurement;
mod shortcuts;

pub use active::{ActiveTool, CanvasClick, CompletedGesture, ToolKind};
pub use angle::{automatic_angles, AngleMeasurement, AUTO_ANGLE_MIN_CONFIDENCE, TRUNK_REFERENCE_OFFSET};
pub use annotation::Annotation;
pub use measurement::{Measurement, MeasurementSummary};
pub use shortcuts::KeyCommand;
