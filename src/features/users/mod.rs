//! # Users Feature
//!
//! Stored user profiles and the manager that owns them.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod manager;
pub mod user;

pub use manager::{Manager, ZERO_COOLDOWN_SECS};
pub use user::User;
