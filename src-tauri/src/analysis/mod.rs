//! Craft photo analysis via schema-constrained Gemini generation.

pub mod gemini;
pub mod image_prep;
pub mod prompts;
pub mod types;

pub use gemini::analyze;
pub use image_prep::{image_media_type, prepare_image};
pub use types::*;
