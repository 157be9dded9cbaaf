//! Pose Analysis Web - video pose-analysis overlay engine
//!
//! Draws a pose skeleton, joint trajectories, measurements, annotations
//! and joint angles over a playing video, with calibration to meters,
//! a magnifier, frame capture and JSON export.
//!
//! Entry point for the WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! ```javascript
//! import init, { PoseAnalyzer, initLogging } from './pose_analysis_web.js';
//!
//! await init();
//! initLogging('info');
//!
//! const analyzer = new PoseAnalyzer(video, canvas, 'session-42');
//! analyzer.loadPoses(frames);
//! analyzer.start();
//!
//! canvas.addEventListener('click', (e) => analyzer.handleClick(e.clientX, e.clientY));
//! window.addEventListener('keydown', (e) => analyzer.handleKey(e.key));
//! ```

mod bridge;

pub mod config;
pub mod error;
pub mod geometry;
pub mod pose;
pub mod renderer;
pub mod session;
pub mod style;
pub mod tools;
pub mod tracking;

use wasm_bindgen::prelude::*;

pub use bridge::PoseAnalyzer;
pub use error::AnalysisError;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize logging with specified level.
///
/// @param {string} level - "trace", "debug", "info", "warn" or "error"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };

    wasm_logger::init(wasm_logger::Config::new(log_level));
    log::info!("pose analysis initialized with log level: {}", level);
}

/// @returns {string} crate version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
