//! Angle measurements - user-defined (three clicks) and automatic
//! (recomputed from anatomical triples every frame, never stored)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{angle_at, round_to, CanvasSize, Point};
use crate::pose::{
    PoseFrame, LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, RIGHT_ANKLE, RIGHT_HIP,
    RIGHT_KNEE, RIGHT_SHOULDER,
};

/// Joints must clear this for automatic angles
pub const AUTO_ANGLE_MIN_CONFIDENCE: f64 = 0.5;

/// Height (px) of the synthetic vertical reference above the hip midpoint
pub const TRUNK_REFERENCE_OFFSET: f64 = 100.0;

mod colors {
    pub const LEFT_KNEE: &str = "#4ecdc4";
    pub const RIGHT_KNEE: &str = "#ff6b6b";
    pub const TRUNK: &str = "#ffd93d";
    pub const USER: &str = "#a29bfe";
}

/// An angle at `points[1]`, all points in canvas pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleMeasurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Degrees
    pub angle: f64,
    pub points: [Point; 3],
    pub color: String,
    pub is_user_defined: bool,
}

impl AngleMeasurement {
    /// Three clicked points; `None` when two of them coincide
    pub fn user_defined(points: [Point; 3], ordinal: usize) -> Option<Self> {
        let angle = angle_at(points[0], points[1], points[2])?;
        Some(Self {
            id: Some(Uuid::new_v4().to_string()),
            name: format!("Angle {}", ordinal),
            angle: round_to(angle, 1),
            points,
            color: colors::USER.to_string(),
            is_user_defined: true,
        })
    }

    fn automatic(name: &str, points: [Point; 3], color: &str) -> Option<Self> {
        let angle = angle_at(points[0], points[1], points[2])?;
        Some(Self {
            id: None,
            name: name.to_string(),
            angle: round_to(angle, 1),
            points,
            color: color.to_string(),
            is_user_defined: false,
        })
    }

    pub fn label(&self) -> String {
        format!("{:.1}°", self.angle)
    }
}

/// Knee angles (hip-knee-ankle) and trunk inclination for one frame.
/// Triples with any joint at or below 0.5 confidence are skipped.
pub fn automatic_angles(frame: &PoseFrame, size: CanvasSize) -> Vec<AngleMeasurement> {
    let pixel = |idx: usize| {
        frame
            .confident(idx, AUTO_ANGLE_MIN_CONFIDENCE)
            .map(|kp| kp.position().to_pixels(size))
    };

    let mut angles = Vec::with_capacity(3);

    let knees = [
        ("Left knee", LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, colors::LEFT_KNEE),
        ("Right knee", RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, colors::RIGHT_KNEE),
    ];
    for (name, hip, knee, ankle, color) in knees {
        if let (Some(h), Some(k), Some(a)) = (pixel(hip), pixel(knee), pixel(ankle)) {
            angles.extend(AngleMeasurement::automatic(name, [h, k, a], color));
        }
    }

    if let (Some(ls), Some(rs), Some(lh), Some(rh)) = (
        pixel(LEFT_SHOULDER),
        pixel(RIGHT_SHOULDER),
        pixel(LEFT_HIP),
        pixel(RIGHT_HIP),
    ) {
        let shoulder_mid = ls.midpoint(&rs);
        let hip_mid = lh.midpoint(&rh);
        let vertical = Point::new(hip_mid.x, hip_mid.y - TRUNK_REFERENCE_OFFSET);
        angles.extend(AngleMeasurement::automatic(
            "Trunk inclination",
            [shoulder_mid, hip_mid, vertical],
            colors::TRUNK,
        ));
    }

    angles
}
