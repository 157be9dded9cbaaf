//! Keypoint layout for the 33-point full-body pose topology
//!
//! Indices are semantic: connections, groups and tracked joints are all
//! defined by index and must match the layout of the pose feed.

use serde::{Deserialize, Serialize};

/// Number of keypoints in every pose frame
pub const KEYPOINT_COUNT: usize = 33;

// ============================================================================
// LANDMARK INDICES
// ============================================================================

pub const NOSE: usize = 0;
pub const LEFT_EYE_INNER: usize = 1;
pub const LEFT_EYE: usize = 2;
pub const LEFT_EYE_OUTER: usize = 3;
pub const RIGHT_EYE_INNER: usize = 4;
pub const RIGHT_EYE: usize = 5;
pub const RIGHT_EYE_OUTER: usize = 6;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const MOUTH_LEFT: usize = 9;
pub const MOUTH_RIGHT: usize = 10;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_PINKY: usize = 17;
pub const RIGHT_PINKY: usize = 18;
pub const LEFT_INDEX: usize = 19;
pub const RIGHT_INDEX: usize = 20;
pub const LEFT_THUMB: usize = 21;
pub const RIGHT_THUMB: usize = 22;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_HEEL: usize = 29;
pub const RIGHT_HEEL: usize = 30;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

/// Canonical keypoint names, indexed like the pose feed
pub const KEYPOINT_NAMES: [&str; KEYPOINT_COUNT] = [
    "nose",
    "left_eye_inner", "left_eye", "left_eye_outer",
    "right_eye_inner", "right_eye", "right_eye_outer",
    "left_ear", "right_ear",
    "mouth_left", "mouth_right",
    "left_shoulder", "right_shoulder",
    "left_elbow", "right_elbow",
    "left_wrist", "right_wrist",
    "left_pinky", "right_pinky",
    "left_index", "right_index",
    "left_thumb", "right_thumb",
    "left_hip", "right_hip",
    "left_knee", "right_knee",
    "left_ankle", "right_ankle",
    "left_heel", "right_heel",
    "left_foot_index", "right_foot_index",
];

/// Bone connections (pairs of keypoint indices)
pub const SKELETON_CONNECTIONS: [(usize, usize); 35] = [
    // Head
    (NOSE, LEFT_EYE_INNER), (LEFT_EYE_INNER, LEFT_EYE), (LEFT_EYE, LEFT_EYE_OUTER),
    (LEFT_EYE_OUTER, LEFT_EAR),
    (NOSE, RIGHT_EYE_INNER), (RIGHT_EYE_INNER, RIGHT_EYE), (RIGHT_EYE, RIGHT_EYE_OUTER),
    (RIGHT_EYE_OUTER, RIGHT_EAR),
    (MOUTH_LEFT, MOUTH_RIGHT),
    // Shoulders + left arm
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_SHOULDER, LEFT_ELBOW), (LEFT_ELBOW, LEFT_WRIST),
    (LEFT_WRIST, LEFT_PINKY), (LEFT_WRIST, LEFT_INDEX), (LEFT_WRIST, LEFT_THUMB),
    (LEFT_PINKY, LEFT_INDEX),
    // Right arm
    (RIGHT_SHOULDER, RIGHT_ELBOW), (RIGHT_ELBOW, RIGHT_WRIST),
    (RIGHT_WRIST, RIGHT_PINKY), (RIGHT_WRIST, RIGHT_INDEX), (RIGHT_WRIST, RIGHT_THUMB),
    (RIGHT_PINKY, RIGHT_INDEX),
    // Torso
    (LEFT_SHOULDER, LEFT_HIP), (RIGHT_SHOULDER, RIGHT_HIP), (LEFT_HIP, RIGHT_HIP),
    // Legs
    (LEFT_HIP, LEFT_KNEE), (RIGHT_HIP, RIGHT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE), (RIGHT_KNEE, RIGHT_ANKLE),
    (LEFT_ANKLE, LEFT_HEEL), (RIGHT_ANKLE, RIGHT_HEEL),
    (LEFT_HEEL, LEFT_FOOT_INDEX), (RIGHT_HEEL, RIGHT_FOOT_INDEX),
    (LEFT_ANKLE, LEFT_FOOT_INDEX), (RIGHT_ANKLE, RIGHT_FOOT_INDEX),
];

/// Joints whose path history is tracked (sprint-relevant)
pub const TRACKED_JOINTS: [usize; 9] = [
    LEFT_ANKLE, RIGHT_ANKLE,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_HIP, RIGHT_HIP,
    LEFT_WRIST, RIGHT_WRIST,
    NOSE,
];

// ============================================================================
// KEYPOINT GROUPS
// ============================================================================

/// Named anatomical subset used for highlight and focus filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeypointGroup {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl KeypointGroup {
    pub const ALL: [KeypointGroup; 6] = [
        KeypointGroup::Head,
        KeypointGroup::Torso,
        KeypointGroup::LeftArm,
        KeypointGroup::RightArm,
        KeypointGroup::LeftLeg,
        KeypointGroup::RightLeg,
    ];

    pub fn indices(&self) -> &'static [usize] {
        match self {
            KeypointGroup::Head => &[
                NOSE, LEFT_EYE_INNER, LEFT_EYE, LEFT_EYE_OUTER,
                RIGHT_EYE_INNER, RIGHT_EYE, RIGHT_EYE_OUTER,
                LEFT_EAR, RIGHT_EAR, MOUTH_LEFT, MOUTH_RIGHT,
            ],
            KeypointGroup::Torso => &[LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP],
            KeypointGroup::LeftArm => &[
                LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_PINKY, LEFT_INDEX, LEFT_THUMB,
            ],
            KeypointGroup::RightArm => &[
                RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST, RIGHT_PINKY, RIGHT_INDEX, RIGHT_THUMB,
            ],
            KeypointGroup::LeftLeg => &[
                LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, LEFT_HEEL, LEFT_FOOT_INDEX,
            ],
            KeypointGroup::RightLeg => &[
                RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, RIGHT_HEEL, RIGHT_FOOT_INDEX,
            ],
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeypointGroup::Head => "head",
            KeypointGroup::Torso => "torso",
            KeypointGroup::LeftArm => "leftArm",
            KeypointGroup::RightArm => "rightArm",
            KeypointGroup::LeftLeg => "leftLeg",
            KeypointGroup::RightLeg => "rightLeg",
        }
    }
}

/// Name for a keypoint index, if in range
pub fn keypoint_name(index: usize) -> Option<&'static str> {
    KEYPOINT_NAMES.get(index).copied()
}
