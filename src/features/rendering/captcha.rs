//! CAPTCHA images for member verification.
//!
//! A blurred random-color background, a layer of faint letter noise, then
//! the challenge drawn across the middle with every character jittered in
//! position, size, and angle.

use anyhow::{bail, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rand::Rng;
use std::path::{Path, PathBuf};

use super::renderer::{Renderer, TextStyle};
use crate::core::Config;

pub const CAPTCHA_SIZE: u32 = 256;
const GRADIENT_CELLS: u32 = 3;
const NOISE_GLYPH_COUNT: usize = 100;
const NOISE_GLYPHS: &[u8] = b"QWERTYUIOPASDFGHJKLZXCVBNMqwertyuiopasdfghjklzxcvbnm";

/// Fonts used by the CAPTCHA.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptchaFonts {
    /// Noise letters
    pub background: PathBuf,
    /// Challenge text
    pub text: PathBuf,
}

impl CaptchaFonts {
    pub fn from_config(config: &Config) -> Self {
        CaptchaFonts {
            background: config.captcha_background_font.clone(),
            text: config.captcha_font.clone(),
        }
    }
}

/// Opaque color with every channel drawn from `min..=max`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, min: u8, max: u8) -> Rgba<u8> {
    Rgba([
        rng.random_range(min..=max),
        rng.random_range(min..=max),
        rng.random_range(min..=max),
        255,
    ])
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A random all-digit challenge of `len` characters.
pub fn random_challenge(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Render a CAPTCHA for `text` into `dir` and return the file path.
pub fn render_captcha(text: &str, fonts: &CaptchaFonts, dir: impl AsRef<Path>) -> Result<PathBuf> {
    render_captcha_with(&mut rand::rng(), text, fonts, dir)
}

/// [`render_captcha`] with a caller-supplied random source.
pub fn render_captcha_with<R: Rng + ?Sized>(
    rng: &mut R,
    text: &str,
    fonts: &CaptchaFonts,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let mut renderer = compose_captcha(rng, text, fonts)?;
    renderer.save(dir, "jpg")
}

/// Build the CAPTCHA canvas without saving it.
pub fn compose_captcha<R: Rng + ?Sized>(
    rng: &mut R,
    text: &str,
    fonts: &CaptchaFonts,
) -> Result<Renderer> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        bail!("CAPTCHA text must not be empty");
    }

    // Background: a few random cells smoothed up to full size
    let mut cells = RgbaImage::new(GRADIENT_CELLS, GRADIENT_CELLS);
    for pixel in cells.pixels_mut() {
        *pixel = random_color(rng, 0, 50);
    }
    let background = imageops::resize(&cells, CAPTCHA_SIZE, CAPTCHA_SIZE, FilterType::Triangle);
    let mut renderer = Renderer::from_image(background);

    let max = (CAPTCHA_SIZE - 1) as i32;

    for _ in 0..NOISE_GLYPH_COUNT {
        let glyph = char::from(NOISE_GLYPHS[rng.random_range(0..NOISE_GLYPHS.len())]);
        let x = rng.random_range(0..=max) as f32;
        let y = rng.random_range(0..=max) as f32;
        let style = TextStyle::new(
            &fonts.background,
            rng.random_range(10..=60) as f32,
            random_color(rng, 0, 128),
        )
        .anchor(0.5, 0.5)
        .rotation(rng.random_range(0..=360) as f32)
        .opacity(rng.random_range(20..=100));

        renderer.draw_text(&glyph.to_string(), (x, y), &style)?;
    }

    let start = rng.random_range(30..=50) as f32;
    let end = rng.random_range(210..=230) as f32;
    let last = chars.len() - 1;

    for (index, c) in chars.iter().enumerate() {
        let t = if last == 0 {
            0.5
        } else {
            index as f32 / last as f32
        };
        let x = lerp(start, end, t) + rng.random_range(-5..=5) as f32;
        let y = rng.random_range(90..=150) as f32;
        let style = TextStyle::new(
            &fonts.text,
            rng.random_range(50..=80) as f32,
            random_color(rng, 128, 255),
        )
        .anchor(0.5, 0.5)
        .rotation(rng.random_range(-25..=25) as f32);

        renderer.draw_text(&c.to_string(), (x, y), &style)?;
    }

    Ok(renderer)
}
