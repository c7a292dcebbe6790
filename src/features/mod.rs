//! # Features Layer
//!
//! - **leveling**: experience points and level math
//! - **reminders**: reminder records and duration parsing
//! - **users**: user profiles and the JSON-backed store
//! - **rendering**: canvas compositing and CAPTCHA generation

pub mod leveling;
pub mod reminders;
pub mod rendering;
pub mod users;

pub use leveling::Progress;
pub use reminders::Reminder;
pub use rendering::{render_captcha, CaptchaFonts, ImageOptions, Renderer, TextStyle};
pub use users::{Manager, User};
