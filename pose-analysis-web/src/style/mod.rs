//! Style module - color validation and sanitization
//!
//! Re-exports only. All logic in submodules.

mod color;

pub use color::{
    is_valid_color, parse_color, rotated_hue, sanitize_color, with_alpha, Rgba, FALLBACK_COLOR,
};
