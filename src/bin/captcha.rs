//! # CAPTCHA renderer
//!
//! Renders a verification CAPTCHA and prints the path of the image.
//!
//! Usage: `cargo run --bin captcha -- [TEXT]` (random digits when omitted)

use anyhow::Result;
use dotenvy::dotenv;
use log::info;

use odbs::core::Config;
use odbs::features::rendering::{random_challenge, render_captcha, CaptchaFonts};

/// Length of generated challenges
const CHALLENGE_LEN: usize = 5;

fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| random_challenge(CHALLENGE_LEN));

    info!("Rendering CAPTCHA into {}", config.render_dir.display());

    let path = render_captcha(&text, &CaptchaFonts::from_config(&config), &config.render_dir)?;

    println!("{}\t{}", text, path.display());
    Ok(())
}
