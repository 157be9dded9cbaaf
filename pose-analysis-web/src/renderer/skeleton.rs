//! Skeleton rendering - bones and keypoint dots for the matched frame

use super::shapes::{circle, font, line, DrawOp, Paint, TextAlign};
use crate::config::{AnalysisMode, OverlaySettings};
use crate::geometry::CanvasSize;
use crate::pose::{KeypointGroup, PoseFrame, SKELETON_CONNECTIONS};
use crate::style::with_alpha;

/// Index labels are only drawn above this confidence
pub const INDEX_LABEL_MIN_CONFIDENCE: f64 = 0.7;

const KEYPOINT_RADIUS: f64 = 5.0;
const TOUCH_KEYPOINT_RADIUS: f64 = 8.0;
const FOCUS_SCALE: f64 = 1.5;
const BONE_WIDTH: f64 = 3.0;

/// Everything the skeleton layer reads besides the frame
#[derive(Debug, Clone)]
pub struct SkeletonStyle<'a> {
    pub mode: AnalysisMode,
    pub focus_group: Option<KeypointGroup>,
    pub min_confidence: f64,
    pub show_indices: bool,
    pub touch_device: bool,
    pub selected: Option<usize>,
    pub keypoint_color: &'a str,
    pub connection_color: &'a str,
    pub highlight_color: &'a str,
    pub selected_color: &'a str,
}

impl<'a> SkeletonStyle<'a> {
    pub fn from_settings(settings: &'a OverlaySettings, selected: Option<usize>) -> Self {
        Self {
            mode: settings.mode,
            focus_group: settings.focus_group,
            min_confidence: settings.min_confidence,
            show_indices: settings.show_keypoint_indices,
            touch_device: settings.touch_device,
            selected,
            keypoint_color: &settings.keypoint_color,
            connection_color: &settings.connection_color,
            highlight_color: &settings.highlight_color,
            selected_color: &settings.selected_color,
        }
    }

    /// Focus mode restricts drawing to the active group
    fn focus_filter(&self) -> Option<KeypointGroup> {
        match self.mode {
            AnalysisMode::Focus => self.focus_group,
            _ => None,
        }
    }

    fn in_group(&self, index: usize) -> bool {
        self.focus_group.map(|g| g.contains(index)).unwrap_or(false)
    }

    fn radius(&self) -> f64 {
        let base = if self.touch_device { TOUCH_KEYPOINT_RADIUS } else { KEYPOINT_RADIUS };
        if self.focus_filter().is_some() { base * FOCUS_SCALE } else { base }
    }
}

/// Build bones then dots for `frame`. Trajectory mode draws nothing here.
pub fn build_skeleton_ops(frame: &PoseFrame, style: &SkeletonStyle, size: CanvasSize) -> Vec<DrawOp> {
    if style.mode == AnalysisMode::Trajectory {
        return Vec::new();
    }

    let mut ops = build_connection_ops(frame, style, size);
    ops.extend(build_keypoint_ops(frame, style, size));
    ops
}

fn build_connection_ops(frame: &PoseFrame, style: &SkeletonStyle, size: CanvasSize) -> Vec<DrawOp> {
    let filter = style.focus_filter();
    let width = if filter.is_some() { BONE_WIDTH * FOCUS_SCALE } else { BONE_WIDTH };

    SKELETON_CONNECTIONS
        .iter()
        .filter(|(a, b)| filter.map(|g| g.contains(*a) && g.contains(*b)).unwrap_or(true))
        .filter_map(|&(a, b)| {
            let start = frame.confident(a, style.min_confidence)?;
            let end = frame.confident(b, style.min_confidence)?;

            let color = if style.selected == Some(a) || style.selected == Some(b) {
                style.selected_color
            } else if style.in_group(a) || style.in_group(b) {
                style.highlight_color
            } else {
                style.connection_color
            };

            Some(line(
                start.position().to_pixels(size),
                end.position().to_pixels(size),
                color,
                width,
            ))
        })
        .collect()
}

fn build_keypoint_ops(frame: &PoseFrame, style: &SkeletonStyle, size: CanvasSize) -> Vec<DrawOp> {
    let filter = style.focus_filter();
    let radius = style.radius();
    let mut ops = Vec::new();

    for (idx, kp) in frame.keypoints().iter().enumerate() {
        if !kp.is_confident(style.min_confidence) {
            continue;
        }
        if let Some(group) = filter {
            if !group.contains(idx) {
                continue;
            }
        }

        let center = kp.position().to_pixels(size);
        let color = if style.selected == Some(idx) {
            style.selected_color
        } else if style.in_group(idx) {
            style.highlight_color
        } else {
            style.keypoint_color
        };
        let r = if style.selected == Some(idx) { radius * 1.4 } else { radius };

        ops.push(circle(
            center,
            r,
            Paint::Radial { inner: color.to_string(), outer: with_alpha(color, 0.3) },
        ));

        if style.show_indices && kp.score > INDEX_LABEL_MIN_CONFIDENCE {
            ops.push(DrawOp::Text {
                at: center.offset(r + 2.0, -r),
                text: idx.to_string(),
                color: "#ffffff".to_string(),
                font: font(10.0, false),
                align: TextAlign::Left,
            });
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{uniform_frame, Keypoint, LEFT_KNEE, RIGHT_ANKLE, RIGHT_KNEE};

    fn size() -> CanvasSize {
        CanvasSize::new(100.0, 100.0)
    }

    fn frame_with_scores(scores: &[(usize, f64)]) -> PoseFrame {
        let mut kps: Vec<Keypoint> = uniform_frame(0.0, 0.5, 0.5, 0.9).keypoints().to_vec();
        for &(idx, score) in scores {
            kps[idx].score = score;
        }
        PoseFrame::new(0.0, kps).unwrap()
    }

    fn count(ops: &[DrawOp], pred: fn(&DrawOp) -> bool) -> usize {
        ops.iter().filter(|op| pred(*op)).count()
    }

    fn is_line(op: &DrawOp) -> bool {
        matches!(op, DrawOp::Line { .. })
    }

    fn is_circle(op: &DrawOp) -> bool {
        matches!(op, DrawOp::Circle { .. })
    }

    #[test]
    fn test_full_mode_draws_everything() {
        let settings = OverlaySettings::default();
        let style = SkeletonStyle::from_settings(&settings, None);
        let ops = build_skeleton_ops(&frame_with_scores(&[]), &style, size());
        assert_eq!(count(&ops, is_line), SKELETON_CONNECTIONS.len());
        assert_eq!(count(&ops, is_circle), 33);
    }

    #[test]
    fn test_threshold_excludes_points_and_bones() {
        let settings = OverlaySettings::default();
        let style = SkeletonStyle::from_settings(&settings, None);
        // exactly at threshold is excluded
        let ops = build_skeleton_ops(&frame_with_scores(&[(RIGHT_KNEE, 0.4)]), &style, size());
        let bones_touching_knee = SKELETON_CONNECTIONS
            .iter()
            .filter(|(a, b)| *a == RIGHT_KNEE || *b == RIGHT_KNEE)
            .count();
        assert_eq!(count(&ops, is_line), SKELETON_CONNECTIONS.len() - bones_touching_knee);
        assert_eq!(count(&ops, is_circle), 32);
    }

    #[test]
    fn test_trajectory_mode_suppresses_skeleton() {
        let settings = OverlaySettings { mode: AnalysisMode::Trajectory, ..Default::default() };
        let style = SkeletonStyle::from_settings(&settings, None);
        assert!(build_skeleton_ops(&frame_with_scores(&[]), &style, size()).is_empty());
    }

    #[test]
    fn test_focus_mode_restricts_to_group() {
        let settings = OverlaySettings {
            mode: AnalysisMode::Focus,
            focus_group: Some(KeypointGroup::RightLeg),
            ..Default::default()
        };
        let style = SkeletonStyle::from_settings(&settings, None);
        let ops = build_skeleton_ops(&frame_with_scores(&[]), &style, size());
        assert_eq!(count(&ops, is_circle), KeypointGroup::RightLeg.indices().len());
        for op in &ops {
            match op {
                DrawOp::Circle { radius, .. } => assert_eq!(*radius, KEYPOINT_RADIUS * FOCUS_SCALE),
                DrawOp::Line { stroke, .. } => assert_eq!(stroke, &Paint::solid(&settings.highlight_color)),
                _ => {}
            }
        }
    }

    #[test]
    fn test_highlight_and_selection_colors() {
        let settings = OverlaySettings {
            focus_group: Some(KeypointGroup::LeftLeg),
            ..Default::default()
        };
        let style = SkeletonStyle::from_settings(&settings, Some(RIGHT_ANKLE));
        let ops = build_connection_ops(&frame_with_scores(&[]), &style, size());
        let stroke_of = |a: usize, b: usize| {
            let i = SKELETON_CONNECTIONS.iter().position(|c| *c == (a, b)).unwrap();
            match &ops[i] {
                DrawOp::Line { stroke, .. } => stroke.fallback_color().to_string(),
                _ => unreachable!(),
            }
        };
        assert_eq!(stroke_of(crate::pose::LEFT_HIP, LEFT_KNEE), settings.highlight_color);
        assert_eq!(stroke_of(RIGHT_KNEE, RIGHT_ANKLE), settings.selected_color);
        assert_eq!(stroke_of(crate::pose::LEFT_SHOULDER, crate::pose::RIGHT_SHOULDER), settings.connection_color);
    }

    #[test]
    fn test_index_labels_need_high_confidence() {
        let settings = OverlaySettings { show_keypoint_indices: true, ..Default::default() };
        let style = SkeletonStyle::from_settings(&settings, None);
        let ops = build_keypoint_ops(&frame_with_scores(&[(0, 0.6), (1, 0.71)]), &style, size());
        let labels: Vec<&str> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 32);
        assert!(!labels.contains(&"0"));
        assert!(labels.contains(&"1"));
    }

    #[test]
    fn test_touch_radius() {
        let settings = OverlaySettings { touch_device: true, ..Default::default() };
        let style = SkeletonStyle::from_settings(&settings, None);
        let ops = build_keypoint_ops(&frame_with_scores(&[]), &style, size());
        assert!(matches!(ops[0], DrawOp::Circle { radius, .. } if radius == TOUCH_KEYPOINT_RADIUS));
    }
}
