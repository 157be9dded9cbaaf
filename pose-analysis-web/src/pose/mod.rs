//! Pose module - keypoint layout and the pose-data feed
//!
//! Re-exports only. All logic in submodules.

mod frame;
mod landmarks;

#[cfg(test)]
pub(crate) use frame::tests::uniform_frame;

pub use frame::{Keypoint, PoseFrame, PoseSequence, MAX_FRAME_GAP};
pub use landmarks::*;
