//! File utility functions for rendered and downloaded images
//!
//! Helpers for generating random filenames, mapping image content types to
//! extensions, and downloading remote images into a staging directory.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Downloads are written straight to disk and non-success statuses are errors
//! - 1.0.0: Initial creation with download and filename helpers

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// ============================================================================
// Constants
// ============================================================================

/// Extension used when neither the Content-Type nor the URL names an image type
pub const FALLBACK_IMAGE_EXTENSION: &str = "png";

// ============================================================================
// Filename utilities
// ============================================================================

/// Random identifier used for generated filenames (32 lowercase hex chars).
pub fn rand_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Build `<dir>/<rand_id>.<ext>`.
pub fn random_path(dir: &Path, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", rand_id(), ext.trim_start_matches('.')))
}

/// Extract the lowercase file extension from a URL path (without query string).
fn url_extension(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let path = path.split('#').next().unwrap_or(path);

    if let Some(last_segment) = path.rsplit('/').next() {
        if let Some(dot_pos) = last_segment.rfind('.') {
            let ext = &last_segment[dot_pos + 1..];
            if !ext.is_empty() && ext.len() <= 5 {
                return ext.to_lowercase();
            }
        }
    }
    String::new()
}

/// Format a byte count as a human-readable string (e.g., "1.5 MB", "340 KB").
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

// ============================================================================
// MIME / extension mapping
// ============================================================================

/// Map an image file extension to its MIME type.
pub fn extension_to_mime(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Map an image MIME type to a file extension (without dot).
pub fn mime_to_extension(mime: &str) -> Option<&'static str> {
    let mime = mime.split(';').next().unwrap_or("").trim().to_lowercase();
    match mime.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some("ico"),
        "image/tiff" => Some("tiff"),
        _ => None,
    }
}

/// Pick the extension for a downloaded image: Content-Type first, then the
/// URL, then [`FALLBACK_IMAGE_EXTENSION`].
pub fn image_extension(content_type: &str, url: &str) -> &'static str {
    if let Some(ext) = mime_to_extension(content_type) {
        return ext;
    }
    match url_extension(url).as_str() {
        "png" => "png",
        "jpg" | "jpeg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        "bmp" => "bmp",
        _ => FALLBACK_IMAGE_EXTENSION,
    }
}

// ============================================================================
// Download
// ============================================================================

/// Download an image from a URL into `dir` under a random filename.
///
/// Returns the path of the written file. A non-success HTTP status is an
/// error and leaves nothing on disk.
pub async fn download_image(url: &str, dir: &Path, timeout_secs: u64) -> Result<PathBuf> {
    let start = Instant::now();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            anyhow!("Image request timed out after {timeout_secs} seconds")
        } else if e.is_connect() {
            anyhow!("Could not connect to the image host")
        } else {
            anyhow!("Image request failed: {e}")
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("Image host returned HTTP {status} for {url}"));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        warn!("Downloaded image from {url} is empty (0 bytes)");
    }

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating download directory {}", dir.display()))?;

    let path = random_path(dir, image_extension(&content_type, url));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("writing downloaded image to {}", path.display()))?;

    debug!(
        "image {} downloaded ({}) in {:.3}s",
        path.display(),
        format_file_size(bytes.len() as u64),
        start.elapsed().as_secs_f64()
    );

    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================
