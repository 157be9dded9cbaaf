//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points and DOM access live here.
//! Re-exports only in mod.rs, logic in submodules.

mod analyzer;
mod animation;
mod dom;
mod video_events;

pub use analyzer::PoseAnalyzer;
