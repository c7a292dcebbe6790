//! # Rendering Feature
//!
//! Canvas compositing for generated images, and the CAPTCHA recipe built on it.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: CAPTCHA rendering accepts an explicit random source
//! - 1.0.0: Initial release

pub mod captcha;
pub mod renderer;

pub use captcha::{random_challenge, render_captcha, CaptchaFonts, CAPTCHA_SIZE};
pub use renderer::{Anchor, Crop, ImageOptions, Renderer, TextStyle};

/// DejaVu Sans, shipped under `assets/` with its license.
#[cfg(test)]
pub(crate) fn test_font() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/DejaVuSans.ttf")
}
