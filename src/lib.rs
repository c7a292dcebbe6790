// Core layer - configuration and file helpers
pub mod core;

// Features layer - user store, leveling, reminders, rendering
pub mod features;

pub use core::Config;

pub use features::{
    // Leveling
    Progress,
    // Reminders
    Reminder,
    // Rendering
    render_captcha, CaptchaFonts, ImageOptions, Renderer, TextStyle,
    // Users
    Manager, User,
};
