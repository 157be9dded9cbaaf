//! Geometry module - points, angles and metric scale
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod point;
mod scale;

pub use angles::{angle_at, arc_span};
pub use point::{
    clamp_unit, normalize_in_rect, normalized_segment_pixels, pixel_distance, CanvasSize, Point,
};
pub use scale::{
    round_to, PixelScale, DEFAULT_PIXELS_PER_METER, DEFAULT_REFERENCE_HEIGHT,
    SUBJECT_FRAME_FRACTION,
};
