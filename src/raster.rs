//! Text-to-point rasterization.
//!
//! A label is drawn white on black onto a grayscale canvas, and every pixel
//! brighter than the threshold becomes one point on a square plane centred
//! at the origin. Each point gets a small random depth so the word has some
//! thickness when seen at an angle.
//!
//! ```ignore
//! let rasterizer = TextRasterizer::new(RasterConfig::default());
//! let cloud = rasterizer.rasterize("Home", &mut rng);
//! println!("{} points", cloud.len());
//! ```

use crate::config::RasterConfig;
use crate::glyphs::{glyph, is_lit, GLYPH_ADVANCE, GLYPH_COLUMNS, GLYPH_ROWS};
use glam::Vec3;
use image::{GrayImage, Luma};
use rand::Rng;

/// Largest canvas side the rasterizer will allocate.
const MAX_CANVAS_SIDE: u32 = 16_384;

/// An immutable, ordered set of 3D offsets that form one word.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Vec3>,
}

impl PointCloud {
    /// Wrap a list of offsets.
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// A cloud with no points; its section forms no word.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

impl From<Vec<Vec3>> for PointCloud {
    fn from(points: Vec<Vec3>) -> Self {
        Self::new(points)
    }
}

/// Converts labels into point clouds.
#[derive(Debug, Clone)]
pub struct TextRasterizer {
    config: RasterConfig,
}

impl TextRasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Draw a label onto a fresh canvas.
    ///
    /// Returns `None` when a canvas of the configured size cannot be acquired.
    pub fn rasterize_mask(&self, label: &str) -> Option<GrayImage> {
        let mut canvas = acquire_canvas(self.config.width, self.config.height)?;
        draw_label(&mut canvas, label, self.config.glyph_height);
        Some(canvas)
    }

    /// Rasterize a label into a point cloud.
    ///
    /// An unavailable canvas yields an empty cloud rather than an error.
    pub fn rasterize<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> PointCloud {
        match self.rasterize_mask(label) {
            Some(canvas) => {
                let cloud = self.points_from_canvas(&canvas, rng);
                log::debug!("Rasterized {:?} into {} points", label, cloud.len());
                cloud
            }
            None => {
                log::warn!(
                    "No {}x{} canvas for {:?}; section will have no particles",
                    self.config.width,
                    self.config.height,
                    label
                );
                PointCloud::empty()
            }
        }
    }

    /// Sample an already drawn canvas.
    ///
    /// Pixels are visited in row-major order, so the output order is stable
    /// for a given canvas regardless of the depth jitter.
    pub fn points_from_canvas<R: Rng + ?Sized>(&self, canvas: &GrayImage, rng: &mut R) -> PointCloud {
        let (w, h) = canvas.dimensions();
        if w == 0 || h == 0 {
            return PointCloud::empty();
        }
        let plane = self.config.plane_size;
        let jitter = self.config.depth_jitter;

        let points = canvas
            .enumerate_pixels()
            .filter(|(_, _, px)| px.0[0] > self.config.threshold)
            .map(|(x, y, _)| {
                let tx = (x as f32 / w as f32 - 0.5) * plane;
                let ty = -(y as f32 / h as f32 - 0.5) * plane;
                let tz = (rng.gen::<f32>() - 0.5) * jitter;
                Vec3::new(tx, ty, tz)
            })
            .collect();

        PointCloud::new(points)
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new(RasterConfig::default())
    }
}

fn acquire_canvas(width: u32, height: u32) -> Option<GrayImage> {
    if width == 0 || height == 0 || width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
        return None;
    }
    Some(GrayImage::from_pixel(width, height, Luma([0])))
}

/// Draw `label` centred on the canvas with glyphs about `glyph_height` pixels tall.
fn draw_label(canvas: &mut GrayImage, label: &str, glyph_height: u32) {
    let (w, h) = canvas.dimensions();
    let cell = (glyph_height / GLYPH_ROWS).max(1);
    let chars: Vec<char> = label.chars().collect();
    if chars.is_empty() {
        return;
    }

    let text_width = (chars.len() as i64 * GLYPH_ADVANCE as i64 - 1) * cell as i64;
    let text_height = GLYPH_ROWS as i64 * cell as i64;
    let origin_x = (w as i64 - text_width) / 2;
    let origin_y = (h as i64 - text_height) / 2;

    for (i, c) in chars.iter().enumerate() {
        // Unknown characters still advance the pen.
        let Some(rows) = glyph(*c) else { continue };
        let glyph_x = origin_x + (i as i64 * GLYPH_ADVANCE as i64) * cell as i64;

        for row in 0..GLYPH_ROWS {
            for column in 0..GLYPH_COLUMNS {
                if is_lit(&rows, column, row) {
                    let x = glyph_x + column as i64 * cell as i64;
                    let y = origin_y + row as i64 * cell as i64;
                    fill_block(canvas, x, y, cell);
                }
            }
        }
    }
}

/// Fill a `size`x`size` white square, clipped to the canvas.
fn fill_block(canvas: &mut GrayImage, x: i64, y: i64, size: u32) {
    let (w, h) = canvas.dimensions();
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + size as i64).min(w as i64);
    let y1 = (y + size as i64).min(h as i64);
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px as u32, py as u32, Luma([255]));
        }
    }
}
