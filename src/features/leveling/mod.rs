//! # Leveling Feature
//!
//! Experience points and level progression.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod xp;

pub use xp::{level_for, level_threshold, total_for_level, Progress};
