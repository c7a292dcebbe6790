//! # Feature: Canvas Renderer
//!
//! An RGBA canvas that images and text are composited onto before it is
//! written out as a file. Source images and fonts are decoded once per
//! renderer and reused. Images downloaded for a render are staged as
//! temporary files and removed when the canvas is saved.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Failed downloads are errors instead of missing files
//! - 1.0.0: Initial release with image/text compositing

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use log::{debug, info, warn};
use rusttype::{point, Font, Scale};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::config::DEFAULT_DOWNLOAD_TIMEOUT_SECS;
use crate::core::file_utils::{self, random_path};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Fraction of a layer's width and height that lands on the draw position.
/// `(0, 0)` pins the top-left corner, `(0.5, 0.5)` the center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub h: f32,
    pub v: f32,
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor { h: 0.0, v: 0.0 };
    pub const CENTER: Anchor = Anchor { h: 0.5, v: 0.5 };

    pub fn new(h: f32, v: f32) -> Self {
        Anchor { h, v }
    }
}

/// Source rectangle to draw instead of the whole image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageOptions {
    /// Resize to this size before anything else
    pub size: Option<(u32, u32)>,
    pub anchor: Anchor,
    pub crop: Option<Crop>,
    /// Degrees, counter-clockwise
    pub rotation: f32,
    pub opacity: u8,
}

impl Default for ImageOptions {
    fn default() -> Self {
        ImageOptions {
            size: None,
            anchor: Anchor::TOP_LEFT,
            crop: None,
            rotation: 0.0,
            opacity: 255,
        }
    }
}

impl ImageOptions {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn anchor(mut self, h: f32, v: f32) -> Self {
        self.anchor = Anchor::new(h, v);
        self
    }

    pub fn crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: PathBuf,
    /// Pixel height of the font
    pub size: f32,
    pub color: Rgba<u8>,
    pub anchor: Anchor,
    /// Degrees, counter-clockwise
    pub rotation: f32,
    pub opacity: u8,
}

impl TextStyle {
    pub fn new(font: impl Into<PathBuf>, size: f32, color: Rgba<u8>) -> Self {
        TextStyle {
            font: font.into(),
            size,
            color,
            anchor: Anchor::TOP_LEFT,
            rotation: 0.0,
            opacity: 255,
        }
    }

    pub fn anchor(mut self, h: f32, v: f32) -> Self {
        self.anchor = Anchor::new(h, v);
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }
}

pub struct Renderer {
    canvas: RgbaImage,
    images: HashMap<PathBuf, RgbaImage>,
    fonts: HashMap<PathBuf, Font<'static>>,
    cleanup: Vec<PathBuf>,
    temp_dir: PathBuf,
    download_timeout_secs: u64,
    created: Instant,
}

impl Renderer {
    /// Blank transparent canvas, optionally filled with a solid color.
    pub fn new(width: u32, height: u32, fill: Option<Rgba<u8>>) -> Self {
        let canvas = match fill {
            Some(color) => RgbaImage::from_pixel(width, height, color),
            None => RgbaImage::new(width, height),
        };
        Self::from_image(canvas)
    }

    /// Start from an existing image file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let canvas = image::open(path)
            .with_context(|| format!("loading canvas image {}", path.display()))?
            .to_rgba8();
        Ok(Self::from_image(canvas))
    }

    pub fn from_image(canvas: RgbaImage) -> Self {
        Renderer {
            canvas,
            images: HashMap::new(),
            fonts: HashMap::new(),
            cleanup: Vec::new(),
            temp_dir: PathBuf::from("temp"),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            created: Instant::now(),
        }
    }

    /// Where [`Renderer::download_image`] stages files, and how long it waits.
    pub fn with_downloads(mut self, temp_dir: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        self.temp_dir = temp_dir.into();
        self.download_timeout_secs = timeout_secs;
        self
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut RgbaImage {
        &mut self.canvas
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Temporary files that [`Renderer::save`] will delete.
    pub fn pending_cleanup(&self) -> &[PathBuf] {
        &self.cleanup
    }

    /// Delete `path` once the render is saved.
    pub fn register_temp(&mut self, path: impl Into<PathBuf>) {
        self.cleanup.push(path.into());
    }

    // ------------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------------

    /// Download an image for compositing and schedule it for cleanup.
    pub async fn download_image(&mut self, url: &str) -> Result<PathBuf> {
        let path =
            file_utils::download_image(url, &self.temp_dir, self.download_timeout_secs).await?;
        self.cleanup.push(path.clone());
        Ok(path)
    }

    /// Decoded image for `path`, loaded on first use.
    pub fn get_image(&mut self, path: &Path) -> Result<&RgbaImage> {
        if !self.images.contains_key(path) {
            let image = image::open(path)
                .with_context(|| format!("loading image {}", path.display()))?
                .to_rgba8();
            self.images.insert(path.to_path_buf(), image);
        }
        Ok(&self.images[path])
    }

    /// Parsed font for `path`, loaded on first use. The same font serves
    /// every size.
    pub fn get_font(&mut self, path: &Path) -> Result<&Font<'static>> {
        if !self.fonts.contains_key(path) {
            let data =
                fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
            let font = Font::try_from_vec(data)
                .ok_or_else(|| anyhow!("{} is not a usable font", path.display()))?;
            self.fonts.insert(path.to_path_buf(), font);
        }
        Ok(&self.fonts[path])
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    pub fn draw_image(
        &mut self,
        path: impl AsRef<Path>,
        pos: (f32, f32),
        options: ImageOptions,
    ) -> Result<()> {
        let source = self.get_image(path.as_ref())?;

        let mut layer = match options.size {
            Some((width, height)) => imageops::resize(source, width, height, FilterType::Triangle),
            None => source.clone(),
        };

        if options.rotation != 0.0 {
            layer = rotate_expanded(&layer, options.rotation);
        }

        let pos = anchored(pos, layer.dimensions(), options.anchor);

        if let Some(crop) = options.crop {
            layer = imageops::crop_imm(&layer, crop.x, crop.y, crop.width, crop.height).to_image();
        }

        self.composite(layer, pos, options.opacity);
        Ok(())
    }

    pub fn draw_text(&mut self, text: &str, pos: (f32, f32), style: &TextStyle) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let mut layer = self.render_text(text, style)?;

        if style.rotation != 0.0 {
            layer = rotate_expanded(&layer, style.rotation);
        }

        let pos = anchored(pos, layer.dimensions(), style.anchor);
        self.composite(layer, pos, style.opacity);
        Ok(())
    }

    /// Rasterize `text` onto its own transparent layer, sized to fit.
    pub fn render_text(&mut self, text: &str, style: &TextStyle) -> Result<RgbaImage> {
        let font = self.get_font(&style.font)?;
        let scale = Scale::uniform(style.size);
        let v_metrics = font.v_metrics(scale);

        let glyphs: Vec<_> = font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect();

        let advance = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        let ink = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .map(|bb| bb.max.x)
            .max()
            .unwrap_or(0);

        let width = (advance.ceil() as i32).max(ink).max(1) as u32;
        let height = ((v_metrics.ascent - v_metrics.descent).ceil() as i32).max(1) as u32;

        let mut layer = RgbaImage::new(width, height);
        let [r, g, b, a] = style.color.0;

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = bb.min.x + gx as i32;
                let y = bb.min.y + gy as i32;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * a as f32).round() as u8;
                let pixel = layer.get_pixel_mut(x as u32, y as u32);
                if alpha > pixel.0[3] {
                    *pixel = Rgba([r, g, b, alpha]);
                }
            });
        }

        Ok(layer)
    }

    fn composite(&mut self, mut layer: RgbaImage, (x, y): (i64, i64), opacity: u8) {
        if opacity == 0 {
            return;
        }
        if opacity != 255 {
            apply_opacity(&mut layer, opacity);
        }
        imageops::overlay(&mut self.canvas, &layer, x, y);
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Write the canvas to `<dir>/<random id>.<ext>` and remove every
    /// temporary file registered during the render.
    pub fn save(&mut self, dir: impl AsRef<Path>, ext: &str) -> Result<PathBuf> {
        let start = Instant::now();
        let dir = dir.as_ref();

        fs::create_dir_all(dir)
            .with_context(|| format!("creating render directory {}", dir.display()))?;
        let path = random_path(dir, ext);

        let ext = ext.trim_start_matches('.').to_lowercase();
        let result = if ext == "jpg" || ext == "jpeg" {
            // JPEG has no alpha channel
            DynamicImage::ImageRgba8(self.canvas.clone()).to_rgb8().save(&path)
        } else {
            self.canvas.save(&path)
        };
        result.with_context(|| format!("saving render to {}", path.display()))?;

        debug!(
            "image {} saved in {:.3}s",
            path.display(),
            start.elapsed().as_secs_f64()
        );

        for temp in self.cleanup.drain(..) {
            if let Err(e) = fs::remove_file(&temp) {
                warn!("Could not remove temporary file {}: {e}", temp.display());
            }
        }

        info!(
            "image {} completed in {:.3}s",
            path.display(),
            self.created.elapsed().as_secs_f64()
        );

        Ok(path)
    }
}

/// Top-left corner for a layer of `size` whose anchor point sits on `pos`.
fn anchored(pos: (f32, f32), (width, height): (u32, u32), anchor: Anchor) -> (i64, i64) {
    let x = pos.0 - width as f32 * anchor.h;
    let y = pos.1 - height as f32 * anchor.v;
    (x.round() as i64, y.round() as i64)
}

fn apply_opacity(layer: &mut RgbaImage, opacity: u8) {
    for pixel in layer.pixels_mut() {
        pixel.0[3] = (u16::from(pixel.0[3]) * u16::from(opacity) / 255) as u8;
    }
}

/// Rotate counter-clockwise by `degrees`, growing the layer so no corner is
/// clipped. Uncovered area is transparent.
pub fn rotate_expanded(layer: &RgbaImage, degrees: f32) -> RgbaImage {
    let (width, height) = layer.dimensions();
    let (w, h) = (width as f32, height as f32);
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());

    // Shave float noise so 90 degrees does not grow by a pixel
    let fit = |v: f32| ((v - 1e-3).ceil().max(1.0)) as u32;
    let out_w = fit(w * cos + h * sin);
    let out_h = fit(w * sin + h * cos);

    let side = fit((w * w + h * h).sqrt()).max(width).max(height);
    let mut padded = RgbaImage::new(side, side);
    imageops::overlay(
        &mut padded,
        layer,
        i64::from((side - width) / 2),
        i64::from((side - height) / 2),
    );

    // imageproc turns clockwise for positive angles
    let rotated = rotate_about_center(&padded, -theta, Interpolation::Bilinear, TRANSPARENT);

    let out_w = out_w.min(side);
    let out_h = out_h.min(side);
    imageops::crop_imm(&rotated, (side - out_w) / 2, (side - out_h) / 2, out_w, out_h).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_utils::tests::serve_once;
    use crate::features::rendering::test_font;
    use std::io::Cursor;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: Rgba<u8>) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, color).save(&path).unwrap();
        path
    }

    fn png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
            .write_to(&mut cursor, image::ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_blank_canvas() {
        let renderer = Renderer::new(8, 6, None);
        assert_eq!(renderer.dimensions(), (8, 6));
        assert_eq!(*renderer.canvas().get_pixel(0, 0), TRANSPARENT);

        let filled = Renderer::new(4, 4, Some(WHITE));
        assert!(filled.canvas().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "bg.png", 5, 3, BLUE);
        let renderer = Renderer::from_file(&path).unwrap();
        assert_eq!(renderer.dimensions(), (5, 3));
        assert_eq!(*renderer.canvas().get_pixel(4, 2), BLUE);

        assert!(Renderer::from_file(dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_draw_image_top_left() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", 4, 4, RED);
        let mut renderer = Renderer::new(20, 20, Some(WHITE));

        renderer.draw_image(&path, (10.0, 10.0), ImageOptions::default()).unwrap();

        assert_eq!(*renderer.canvas().get_pixel(10, 10), RED);
        assert_eq!(*renderer.canvas().get_pixel(13, 13), RED);
        assert_eq!(*renderer.canvas().get_pixel(14, 14), WHITE);
        assert_eq!(*renderer.canvas().get_pixel(9, 9), WHITE);
    }

    #[test]
    fn test_draw_image_anchor_and_resize() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", 2, 2, RED);
        let mut renderer = Renderer::new(20, 20, Some(WHITE));

        renderer
            .draw_image(&path, (10.0, 10.0), ImageOptions::default().size(8, 4).anchor(0.5, 1.0))
            .unwrap();

        // 8x4 centered horizontally on x=10 and ending at y=10
        assert_eq!(*renderer.canvas().get_pixel(6, 6), RED);
        assert_eq!(*renderer.canvas().get_pixel(13, 9), RED);
        assert_eq!(*renderer.canvas().get_pixel(5, 6), WHITE);
        assert_eq!(*renderer.canvas().get_pixel(14, 9), WHITE);
        assert_eq!(*renderer.canvas().get_pixel(10, 10), WHITE);
        assert_eq!(*renderer.canvas().get_pixel(10, 5), WHITE);
    }

    #[test]
    fn test_draw_image_crop() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", 10, 10, RED);
        let mut renderer = Renderer::new(20, 20, Some(WHITE));

        let crop = Crop { x: 0, y: 0, width: 3, height: 2 };
        renderer.draw_image(&path, (0.0, 0.0), ImageOptions::default().crop(crop)).unwrap();

        assert_eq!(*renderer.canvas().get_pixel(2, 1), RED);
        assert_eq!(*renderer.canvas().get_pixel(3, 1), WHITE);
        assert_eq!(*renderer.canvas().get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_draw_image_opacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", 2, 2, RED);
        let mut renderer = Renderer::new(4, 4, Some(WHITE));

        renderer.draw_image(&path, (0.0, 0.0), ImageOptions::default().opacity(0)).unwrap();
        assert_eq!(*renderer.canvas().get_pixel(0, 0), WHITE);

        renderer.draw_image(&path, (0.0, 0.0), ImageOptions::default().opacity(128)).unwrap();
        let blended = renderer.canvas().get_pixel(0, 0);
        assert_eq!(blended.0[0], 255);
        assert!(blended.0[1] > 100 && blended.0[1] < 155, "{blended:?}");
    }

    #[test]
    fn test_images_are_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", 2, 2, RED);
        let mut renderer = Renderer::new(4, 4, None);

        renderer.draw_image(&path, (0.0, 0.0), ImageOptions::default()).unwrap();
        fs::remove_file(&path).unwrap();
        renderer.draw_image(&path, (2.0, 2.0), ImageOptions::default()).unwrap();
        assert_eq!(*renderer.canvas().get_pixel(3, 3), RED);
    }

    #[test]
    fn test_missing_image_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = Renderer::new(4, 4, None);
        let result =
            renderer.draw_image(dir.path().join("nope.png"), (0.0, 0.0), ImageOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_rotate_expanded_dimensions() {
        let layer = RgbaImage::from_pixel(4, 2, RED);
        assert_eq!(rotate_expanded(&layer, 90.0).dimensions(), (2, 4));
        assert_eq!(rotate_expanded(&layer, 180.0).dimensions(), (4, 2));

        let diagonal = rotate_expanded(&RgbaImage::from_pixel(10, 10, RED), 45.0);
        assert_eq!(diagonal.dimensions(), (15, 15));
        assert_eq!(diagonal.get_pixel(7, 7).0[3], 255);
        assert_eq!(diagonal.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_save_png_and_jpg() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = Renderer::new(6, 4, Some(BLUE));

        let png = renderer.save(dir.path(), "png").unwrap();
        assert!(png.starts_with(dir.path()));
        assert_eq!(image::open(&png).unwrap().to_rgba8().dimensions(), (6, 4));

        let jpg = renderer.save(dir.path(), "jpg").unwrap();
        assert_ne!(png, jpg);
        assert_eq!(image::open(&jpg).unwrap().to_rgb8().dimensions(), (6, 4));
    }

    #[test]
    fn test_save_removes_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let temp = write_png(dir.path(), "download.png", 2, 2, RED);
        let mut renderer = Renderer::new(4, 4, None);
        renderer.register_temp(&temp);
        // Already gone: logged, not fatal
        renderer.register_temp(dir.path().join("vanished.png"));

        renderer.save(dir.path().join("out"), "png").unwrap();

        assert!(!temp.exists());
        assert!(renderer.pending_cleanup().is_empty());
    }

    #[tokio::test]
    async fn test_download_composite_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once("200 OK", "image/png", png_bytes(3, 3, RED)).await;
        let mut renderer =
            Renderer::new(10, 10, Some(WHITE)).with_downloads(dir.path().join("temp"), 5);

        let path = renderer.download_image(&format!("{url}/avatar.png")).await.unwrap();
        assert!(path.exists());
        assert_eq!(renderer.pending_cleanup(), [path.clone()]);

        renderer.draw_image(&path, (1.0, 1.0), ImageOptions::default()).unwrap();
        assert_eq!(*renderer.canvas().get_pixel(3, 3), RED);

        renderer.save(dir.path().join("out"), "png").unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_download_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once("500 Internal Server Error", "text/plain", Vec::new()).await;
        let mut renderer = Renderer::new(4, 4, None).with_downloads(dir.path(), 5);

        assert!(renderer.download_image(&url).await.is_err());
        assert!(renderer.pending_cleanup().is_empty());
    }

    #[test]
    fn test_bad_font_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        let mut renderer = Renderer::new(4, 4, None);

        let style = TextStyle::new(&path, 12.0, RED);
        assert!(renderer.draw_text("A", (0.0, 0.0), &style).is_err());
        // Empty text never touches the font
        assert!(renderer.draw_text("", (0.0, 0.0), &style).is_ok());
    }

    #[test]
    fn test_draw_text() {
        let font = test_font();
        let mut renderer = Renderer::new(120, 60, Some(WHITE));
        let style = TextStyle::new(&font, 32.0, BLUE).anchor(0.5, 0.5);

        let layer = renderer.render_text("Hi", &style).unwrap();
        assert!(layer.width() > 10 && layer.height() >= 30);
        assert!(layer.pixels().any(|p| p.0[3] == 255));

        renderer.draw_text("Hi", (60.0, 30.0), &style).unwrap();
        let touched = renderer.canvas().pixels().filter(|p| **p != WHITE).count();
        assert!(touched > 20);
        // Centered: nothing lands in the corners
        assert_eq!(*renderer.canvas().get_pixel(0, 0), WHITE);
        assert_eq!(*renderer.canvas().get_pixel(119, 59), WHITE);
    }

    #[test]
    fn test_rotated_text_grows_layer() {
        let font = test_font();
        let mut renderer = Renderer::new(200, 200, None);
        let style = TextStyle::new(&font, 40.0, RED);
        let flat = renderer.render_text("WWWW", &style).unwrap();
        let upright = rotate_expanded(&flat, 90.0);
        assert_eq!(upright.width(), flat.height());
        assert_eq!(upright.height(), flat.width());
    }

    #[test]
    fn test_draw_text_with_rotation_and_opacity() {
        let font = test_font();
        let mut renderer = Renderer::new(200, 200, Some(WHITE));
        let style = TextStyle::new(&font, 48.0, BLUE)
            .anchor(0.5, 0.5)
            .rotation(90.0)
            .opacity(128);

        renderer.draw_text("WW", (100.0, 100.0), &style).unwrap();

        let touched: Vec<_> = renderer
            .canvas()
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != WHITE)
            .collect();
        assert!(touched.len() > 100);

        // Half opacity over white never reaches the pure text color
        assert!(touched.iter().all(|(_, _, p)| p.0[0] >= 120 && p.0[2] >= 250));
        assert!(touched.iter().any(|(_, _, p)| p.0[0] < 140));

        // "WW" is wider than tall, so turned a quarter it stands upright
        let xs = touched.iter().map(|(x, _, _)| *x);
        let ys = touched.iter().map(|(_, y, _)| *y);
        let width = xs.clone().max().unwrap() - xs.min().unwrap();
        let height = ys.clone().max().unwrap() - ys.min().unwrap();
        assert!(height > width, "{width}x{height}");

        // Centered on the draw position
        assert_eq!(*renderer.canvas().get_pixel(0, 0), WHITE);
        assert_eq!(*renderer.canvas().get_pixel(199, 199), WHITE);
    }
}
