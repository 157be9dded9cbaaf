//! Rolling trajectory history for tracked joints
//!
//! One bounded ring of normalized positions per tracked joint, appended
//! once per rendered frame. Cleared on seek so paths never connect
//! across a discontinuous jump.

use std::collections::VecDeque;

use crate::geometry::Point;
use crate::pose::{PoseFrame, TRACKED_JOINTS};

/// Default number of positions kept per joint
pub const DEFAULT_TRAJECTORY_LENGTH: usize = 50;

/// Allowed range for the ring length
pub const MIN_TRAJECTORY_LENGTH: usize = 10;
pub const MAX_TRAJECTORY_LENGTH: usize = 200;

/// Joints at or below this confidence are not recorded
pub const TRAJECTORY_MIN_CONFIDENCE: f64 = 0.5;

/// Path history of every tracked joint
pub struct TrajectoryTracker {
    /// One ring per entry of `TRACKED_JOINTS`, same order
    rings: Vec<VecDeque<Point>>,
    max_len: usize,
}

impl TrajectoryTracker {
    pub fn new(max_len: usize) -> Self {
        let max_len = clamp_length(max_len);
        Self {
            rings: (0..TRACKED_JOINTS.len())
                .map(|_| VecDeque::with_capacity(max_len + 1))
                .collect(),
            max_len,
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Change the ring length; existing rings keep their newest entries
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = clamp_length(max_len);
        for ring in self.rings.iter_mut() {
            while ring.len() > self.max_len {
                ring.pop_front();
            }
        }
    }

    /// Append confident tracked joints of `frame`
    pub fn record(&mut self, frame: &PoseFrame) {
        for (slot, &joint) in TRACKED_JOINTS.iter().enumerate() {
            if let Some(kp) = frame.confident(joint, TRAJECTORY_MIN_CONFIDENCE) {
                self.push(slot, kp.position());
            }
        }
    }

    fn push(&mut self, slot: usize, point: Point) {
        let ring = &mut self.rings[slot];
        ring.push_back(point);
        while ring.len() > self.max_len {
            ring.pop_front();
        }
    }

    /// Empty every ring
    pub fn clear(&mut self) {
        for ring in self.rings.iter_mut() {
            ring.clear();
        }
    }

    /// Ring for a keypoint index, if that joint is tracked
    pub fn ring(&self, joint: usize) -> Option<&VecDeque<Point>> {
        TRACKED_JOINTS
            .iter()
            .position(|&j| j == joint)
            .map(|slot| &self.rings[slot])
    }

    /// (slot, joint index, ring), oldest point first in each ring
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &VecDeque<Point>)> {
        self.rings
            .iter()
            .enumerate()
            .map(|(slot, ring)| (slot, TRACKED_JOINTS[slot], ring))
    }

    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(VecDeque::is_empty)
    }
}

impl Default for TrajectoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TRAJECTORY_LENGTH)
    }
}

pub fn clamp_length(len: usize) -> usize {
    len.clamp(MIN_TRAJECTORY_LENGTH, MAX_TRAJECTORY_LENGTH)
}
