//! # Core Module
//!
//! Configuration and file helpers shared by the store and the renderer.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add file_utils with image download and random filenames
//! - 1.0.0: Initial creation with config module

pub mod clock;
pub mod config;
pub mod file_utils;

// Re-export commonly used items
pub use clock::unix_now;
pub use config::Config;
pub use file_utils::{download_image, rand_id, random_path};
