//! Runtime configuration loaded from environment variables
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Role granted for each level, in level order. Levels past the end of the
/// list keep the last role.
pub const DEFAULT_LEVEL_ROLES: [u64; 11] = [
    976773904968343572,
    976774001793843241,
    976774340714590208,
    976774065782153246,
    976774608197939220,
    976774691966582804,
    976774777291296798,
    976774897470668860,
    976774995516751985,
    976775077376974858,
    976775159358844968,
];

pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub users_file: PathBuf,
    /// Where rendered images are written
    pub render_dir: PathBuf,
    /// Where downloaded images are staged until a render completes
    pub temp_dir: PathBuf,
    pub captcha_background_font: PathBuf,
    pub captcha_font: PathBuf,
    pub level_roles: Vec<u64>,
    pub download_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            users_file: PathBuf::from("users.json"),
            render_dir: PathBuf::from("temp"),
            temp_dir: PathBuf::from("temp"),
            captcha_background_font: PathBuf::from("assets/DejaVuSans.ttf"),
            captcha_font: PathBuf::from("assets/DejaVuSans-Bold.ttf"),
            level_roles: DEFAULT_LEVEL_ROLES.to_vec(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Binaries call `dotenvy::dotenv()` first so a `.env` file is honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("USERS_FILE") {
            config.users_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("RENDER_DIR") {
            config.render_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("TEMP_DIR") {
            config.temp_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CAPTCHA_BACKGROUND_FONT") {
            config.captcha_background_font = PathBuf::from(v);
        }
        if let Some(v) = lookup("CAPTCHA_FONT") {
            config.captcha_font = PathBuf::from(v);
        }
        if let Some(v) = lookup("LEVEL_ROLES") {
            config.level_roles = parse_id_list(&v)
                .map_err(|e| anyhow!("LEVEL_ROLES must be a comma-separated list of ids: {e}"))?;
        }
        if let Some(v) = lookup("DOWNLOAD_TIMEOUT_SECS") {
            config.download_timeout_secs = v
                .trim()
                .parse()
                .map_err(|e| anyhow!("DOWNLOAD_TIMEOUT_SECS must be a number of seconds: {e}"))?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }
}

fn parse_id_list(value: &str) -> Result<Vec<u64>, std::num::ParseIntError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
