//! Session module - per-video overlay state, lifecycle, capture and export
//!
//! Re-exports only. All logic in submodules.

mod capture;
mod export;
mod render_session;
mod video;

pub use capture::{CaptureContent, CaptureList, CapturedFrame, MAX_CAPTURES};
pub use export::{export_file_name, truncate_image, AnalysisDocument, CalibrationInfo, IMAGE_PREVIEW_CHARS};
pub use render_session::{needs_rate_update, step_time, ClickOutcome, RenderSession, FRAME_STEP, SELECT_RADIUS};
pub use video::{VideoEvent, VideoLifecycle, VideoState};
