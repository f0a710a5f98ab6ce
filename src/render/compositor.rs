//! # Raster Compositor
//!
//! Renders a filled-in SVG label to a grayscale bitmap of a fixed height.
//!
//! ```text
//! <svg width="1100" height="696">   target height 696
//!            │                              │
//!            ▼                              ▼
//!   width = 696 * 1100 / 696 = 1100 px, height = 696 px
//!            │
//!            ▼  resvg onto white, RGBA → luma
//!        GrayImage 1100 × 696
//! ```
//!
//! Only the outer `width`/`height` attributes are rewritten; the `viewBox`
//! keeps the drawing's own coordinate system, so the content scales with
//! the output.

use std::sync::Arc;

use image::{GrayImage, Luma};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use tracing::debug;

use super::svg::SvgDocument;
use crate::error::LabelError;

/// Default output height: the printable width of 62mm tape at 300 DPI
pub const DEFAULT_TARGET_HEIGHT: u32 = 696;

/// Units stripped from dimension attributes
const UNIT_SUFFIXES: [&str; 6] = ["px", "pt", "mm", "cm", "in", "pc"];

/// SVG to bitmap renderer holding the font database.
#[derive(Clone)]
pub struct RasterCompositor {
    fontdb: Arc<fontdb::Database>,
}

impl RasterCompositor {
    /// Compositor with the system fonts loaded.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "Loaded system fonts");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Compositor with an empty font database. Text renders as nothing.
    pub fn without_system_fonts() -> Self {
        Self {
            fontdb: Arc::new(fontdb::Database::new()),
        }
    }

    /// Render `document` at `target_height` pixels, keeping its aspect ratio.
    pub fn rasterize(&self, document: &SvgDocument, target_height: u32) -> Result<GrayImage, LabelError> {
        let width = declared_dimension(document, "width")?;
        let height = declared_dimension(document, "height")?;
        if target_height == 0 {
            return Err(LabelError::Rasterization("target height is zero".to_string()));
        }

        let target_width = (target_height as f64 * width / height).round() as u32;
        if target_width == 0 {
            return Err(LabelError::Rasterization(format!(
                "label too narrow: {}x{}",
                width, height
            )));
        }

        let mut document = document.clone();
        document.set_attribute("width", format!("{}px", target_width));
        document.set_attribute("height", format!("{}px", target_height));
        let source = document.to_bytes()?;

        let mut options = usvg::Options::default();
        options.fontdb = self.fontdb.clone();
        let tree = usvg::Tree::from_data(&source, &options)
            .map_err(|e| LabelError::Rasterization(format!("Invalid SVG: {}", e)))?;

        let mut pixmap = Pixmap::new(target_width, target_height).ok_or_else(|| {
            LabelError::Rasterization(format!(
                "cannot allocate {}x{} pixmap",
                target_width, target_height
            ))
        })?;
        pixmap.fill(Color::WHITE);

        let size = tree.size();
        let transform = Transform::from_scale(
            target_width as f32 / size.width(),
            target_height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        debug!(width = target_width, height = target_height, "Label rasterized");
        Ok(to_luma(&pixmap))
    }
}

impl Default for RasterCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RasterCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterCompositor")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

/// Numeric value of a root dimension attribute, unit stripped.
fn declared_dimension(document: &SvgDocument, name: &str) -> Result<f64, LabelError> {
    let raw = document
        .attribute(name)
        .ok_or_else(|| LabelError::Rasterization(format!("SVG has no {} attribute", name)))?;

    let trimmed = raw.trim();
    let number = UNIT_SUFFIXES
        .iter()
        .find_map(|unit| trimmed.strip_suffix(unit))
        .unwrap_or(trimmed)
        .trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(LabelError::Rasterization(format!(
            "invalid SVG {}: '{}'",
            name, raw
        ))),
    }
}

/// The pixmap is opaque, so premultiplied RGBA equals straight RGBA.
fn to_luma(pixmap: &Pixmap) -> GrayImage {
    let mut image = GrayImage::new(pixmap.width(), pixmap.height());
    for (pixel, rgba) in image.pixels_mut().zip(pixmap.data().chunks_exact(4)) {
        let [r, g, b] = [rgba[0] as u32, rgba[1] as u32, rgba[2] as u32];
        *pixel = Luma([((299 * r + 587 * g + 114 * b) / 1000) as u8]);
    }
    image
}

// ============================================================================
// TESTS
// ============================================================================
