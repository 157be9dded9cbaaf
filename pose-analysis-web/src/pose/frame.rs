//! Pose frames and the time-sorted pose sequence
//!
//! The sequence is loaded wholesale by the host and is read-only for the
//! rest of the session. Frame lookup matches the video clock to the
//! nearest sampled instant.

use serde::{Deserialize, Serialize};

use super::landmarks::KEYPOINT_COUNT;
use crate::error::AnalysisError;
use crate::geometry::Point;

/// Frames further than this from the video time (seconds) are not shown
pub const MAX_FRAME_GAP: f64 = 0.1;

// ============================================================================
// KEYPOINT
// ============================================================================

/// A single detected landmark (normalized image-fraction coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub name: String,
}

impl Keypoint {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Strictly above threshold; a score equal to the threshold is rejected
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.score > threshold
    }
}

// ============================================================================
// POSE FRAME
// ============================================================================

/// Wire shape of a frame before validation
#[derive(Deserialize)]
struct RawPoseFrame {
    time: f64,
    keypoints: Vec<Keypoint>,
}

/// All keypoints for one sampled instant. Always holds exactly
/// `KEYPOINT_COUNT` keypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoseFrame")]
pub struct PoseFrame {
    time: f64,
    keypoints: Vec<Keypoint>,
}

impl TryFrom<RawPoseFrame> for PoseFrame {
    type Error = AnalysisError;

    fn try_from(raw: RawPoseFrame) -> Result<Self, Self::Error> {
        PoseFrame::new(raw.time, raw.keypoints)
    }
}

impl PoseFrame {
    pub fn new(time: f64, keypoints: Vec<Keypoint>) -> Result<Self, AnalysisError> {
        if !time.is_finite() {
            return Err(AnalysisError::InvalidPoseData(format!(
                "frame time must be finite, got {}",
                time
            )));
        }
        if keypoints.len() != KEYPOINT_COUNT {
            return Err(AnalysisError::InvalidPoseData(format!(
                "frame at {:.3}s has {} keypoints (expected {})",
                time,
                keypoints.len(),
                KEYPOINT_COUNT
            )));
        }
        Ok(Self { time, keypoints })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn keypoint(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }

    /// Keypoint if it clears the confidence threshold
    pub fn confident(&self, index: usize, threshold: f64) -> Option<&Keypoint> {
        self.keypoint(index).filter(|kp| kp.is_confident(threshold))
    }
}

// ============================================================================
// POSE SEQUENCE
// ============================================================================

/// Time-ordered pose frames for one analysis session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PoseSequence {
    frames: Vec<PoseFrame>,
}

impl PoseSequence {
    /// Build from frames in any order; frames are sorted ascending by time
    pub fn new(mut frames: Vec<PoseFrame>) -> Self {
        frames.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { frames }
    }

    /// Parse a JSON array of frames
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let frames: Vec<PoseFrame> = serde_json::from_str(json)?;
        Ok(Self::new(frames))
    }

    pub fn frames(&self) -> &[PoseFrame] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Option<&PoseFrame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time of the last frame (0 when empty)
    pub fn duration(&self) -> f64 {
        self.frames.last().map(|f| f.time).unwrap_or(0.0)
    }

    /// Index of the frame closest to `time`, or `None` if the closest is
    /// more than `MAX_FRAME_GAP` away. Ties go to the earlier frame.
    pub fn nearest_index(&self, time: f64) -> Option<usize> {
        if self.frames.is_empty() || !time.is_finite() {
            return None;
        }

        // First frame with frame.time >= time
        let upper = self.frames.partition_point(|f| f.time < time);

        let best = match (upper.checked_sub(1), self.frames.get(upper)) {
            (Some(lower), Some(after)) => {
                let d_lower = (time - self.frames[lower].time).abs();
                let d_upper = (after.time - time).abs();
                if d_upper < d_lower { upper } else { lower }
            }
            (Some(lower), None) => lower,
            (None, _) => upper,
        };

        let diff = (self.frames[best].time - time).abs();
        if diff > MAX_FRAME_GAP {
            None
        } else {
            Some(best)
        }
    }

    /// Frame closest to `time` within tolerance
    pub fn nearest(&self, time: f64) -> Option<&PoseFrame> {
        self.nearest_index(time).map(|i| &self.frames[i])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Frame with every keypoint at (x, y) and the given score
    pub(crate) fn uniform_frame(time: f64, x: f64, y: f64, score: f64) -> PoseFrame {
        let keypoints = (0..KEYPOINT_COUNT)
            .map(|i| Keypoint {
                x,
                y,
                score,
                name: crate::pose::keypoint_name(i).unwrap_or_default().to_string(),
            })
            .collect();
        PoseFrame::new(time, keypoints).unwrap()
    }

    #[test]
    fn test_single_frame_scenario() {
        let seq = PoseSequence::new(vec![uniform_frame(1.0, 0.5, 0.5, 0.9)]);
        assert_eq!(seq.nearest(1.05).map(|f| f.time()), Some(1.0));
        assert!(seq.nearest(5.0).is_none());
    }

    #[test]
    fn test_nearest_matches_linear_scan() {
        let times = [0.0, 0.04, 0.07, 0.2, 0.33, 0.5, 0.52, 0.9];
        let seq = PoseSequence::new(
            times.iter().rev().map(|t| uniform_frame(*t, 0.1, 0.1, 1.0)).collect(),
        );

        let mut t = -0.3;
        while t < 1.3 {
            let (best_idx, best_diff) = seq
                .frames()
                .iter()
                .enumerate()
                .map(|(i, f)| (i, (f.time() - t).abs()))
                .fold((0, f64::INFINITY), |acc, cur| if cur.1 < acc.1 { cur } else { acc });

            let expected = if best_diff > MAX_FRAME_GAP { None } else { Some(best_idx) };
            assert_eq!(seq.nearest_index(t), expected, "t = {t}");
            t += 0.013;
        }
    }

    #[test]
    fn test_frames_sorted_on_load() {
        let seq = PoseSequence::new(vec![
            uniform_frame(2.0, 0.0, 0.0, 1.0),
            uniform_frame(0.5, 0.0, 0.0, 1.0),
            uniform_frame(1.0, 0.0, 0.0, 1.0),
        ]);
        let times: Vec<f64> = seq.frames().iter().map(|f| f.time()).collect();
        assert_eq!(times, vec![0.5, 1.0, 2.0]);
        assert_eq!(seq.duration(), 2.0);
    }

    #[test]
    fn test_empty_sequence() {
        let seq = PoseSequence::default();
        assert!(seq.nearest(0.0).is_none());
        assert_eq!(seq.duration(), 0.0);
    }

    #[test]
    fn test_rejects_wrong_keypoint_count() {
        let err = PoseFrame::new(0.0, vec![]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPoseData(_)));
        assert!(PoseFrame::new(f64::NAN, uniform_frame(0.0, 0.0, 0.0, 0.0).keypoints).is_err());
    }

    #[test]
    fn test_from_json() {
        let kp = r#"{"x":0.5,"y":0.5,"score":0.9,"name":"k"}"#;
        let keypoints = vec![kp; KEYPOINT_COUNT].join(",");
        let json = format!(r#"[{{"time":1.5,"keypoints":[{keypoints}]}},{{"time":0.5,"keypoints":[{keypoints}]}}]"#);
        let seq = PoseSequence::from_json(&json).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.frames()[0].time(), 0.5);

        let short = r#"[{"time":0.0,"keypoints":[{"x":0.1,"y":0.1,"score":1.0}]}]"#;
        assert!(PoseSequence::from_json(short).is_err());
    }

    #[test]
    fn test_confidence_threshold_is_strict() {
        let frame = uniform_frame(0.0, 0.2, 0.2, 0.4);
        assert!(frame.confident(0, 0.4).is_none());
        assert!(frame.confident(0, 0.39).is_some());
    }
}
