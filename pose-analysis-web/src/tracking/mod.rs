//! Tracking module - per-joint trajectory history
//!
//! Re-exports only. All logic in submodules.

mod trajectory;

pub use trajectory::{
    clamp_length, TrajectoryTracker, DEFAULT_TRAJECTORY_LENGTH, MAX_TRAJECTORY_LENGTH,
    MIN_TRAJECTORY_LENGTH, TRAJECTORY_MIN_CONFIDENCE,
};
