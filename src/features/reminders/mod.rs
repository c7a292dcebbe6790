//! # Reminders Feature
//!
//! Per-user reminders stored alongside the user profile.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Short Russian unit names for compact durations
//! - 1.1.0: Duration parsing accepts Cyrillic unit letters
//! - 1.0.0: Initial release

pub mod duration;
pub mod reminder;

pub use duration::{format_duration, format_duration_short, parse_duration, unit_name};
pub use reminder::Reminder;
