//! # QL Raster Jobs
//!
//! Converts a rendered label bitmap into the complete command stream for one
//! label.
//!
//! ## Image Preparation
//!
//! ```text
//!  rendered label        rotated            thresholded + padded + mirrored
//! ┌──────────────┐      ┌──────┐            ┌──┬──────┬──┐
//! │ Box 42   ▓▓  │  ──► │      │  ──►       │  │▓▓▓▓▓▓│  │   720 pins
//! │ Cables   ▓▓  │      │      │            │  │      │  │
//! └──────────────┘      └──────┘            └──┴──────┴──┘
//!  height = 696         width = 696          12 + 696 + 12
//! ```
//!
//! 1. Rotate so that the label's height runs across the tape.
//! 2. Scale to the printable width if necessary (aspect preserved).
//! 3. Threshold: a pixel prints if it is darker than the threshold.
//! 4. Place on the print head honouring the right margin, then mirror:
//!    the head's first pin is on the right-hand side.

use image::{GrayImage, imageops};
use tracing::debug;

use super::commands::{self, MediaKind};
use crate::error::LabelError;
use crate::printer::{LabelMedia, QlModel};

/// Default darkness threshold in percent
pub const DEFAULT_THRESHOLD_PERCENT: u8 = 70;

/// Rotation applied before printing (counter-clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    None,
    #[default]
    Deg90,
    Deg180,
    Deg270,
}

/// Settings for turning one bitmap into a raster job
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    pub model: QlModel,
    pub media: LabelMedia,
    pub rotation: Rotation,
    /// Percentage darkness above which a pixel prints
    pub threshold_percent: u8,
    pub cut: bool,
    pub high_quality: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            model: QlModel::QL800,
            media: LabelMedia::CONTINUOUS_62,
            rotation: Rotation::Deg90,
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            cut: true,
            high_quality: true,
        }
    }
}

/// A ready-to-send raster payload
#[derive(Debug, Clone)]
pub struct RasterJob {
    data: Vec<u8>,
    rows: u32,
}

impl RasterJob {
    /// Build the command stream for one label.
    pub fn build(image: &GrayImage, options: &RasterOptions) -> Result<Self, LabelError> {
        let prepared = prepare_image(image, options)?;
        let rows = prepared.height();
        let media = &options.media;

        let mut data = Vec::new();
        data.extend(commands::invalidate());
        data.extend(commands::initialize());
        if options.model.mode_switch {
            data.extend(commands::switch_to_raster());
        }
        data.extend(commands::status_request());

        let kind = if media.is_continuous() {
            MediaKind::Continuous
        } else {
            MediaKind::DieCut
        };
        data.extend(commands::media_and_quality(
            kind,
            media.width_mm,
            media.length_mm,
            rows,
            options.high_quality,
        ));

        if options.cut {
            data.extend(commands::autocut(true));
            data.extend(commands::cut_every(1));
        }
        data.extend(commands::expanded_mode(options.cut, false));
        data.extend(commands::margins(media.feed_margin_dots));

        for row in pack_rows(&prepared, &options.model, media, threshold(options.threshold_percent)) {
            data.extend(commands::raster_line(&row));
        }
        data.extend(commands::print_with_feed());

        debug!(rows, bytes = data.len(), "Raster job built");
        Ok(Self { data, rows })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of raster lines (label length in dots)
    pub fn rows(&self) -> u32 {
        self.rows
    }
}

/// Luma value at or below which a pixel prints
fn threshold(percent: u8) -> u8 {
    let percent = percent.min(100) as f32;
    let inverted = ((1.0 - percent / 100.0) * 255.0) as u8;
    255 - inverted
}

fn prepare_image(image: &GrayImage, options: &RasterOptions) -> Result<GrayImage, LabelError> {
    let rotated = match options.rotation {
        Rotation::None => image.clone(),
        Rotation::Deg90 => imageops::rotate270(image),
        Rotation::Deg180 => imageops::rotate180(image),
        Rotation::Deg270 => imageops::rotate90(image),
    };

    if rotated.width() == 0 || rotated.height() == 0 {
        return Err(LabelError::Rasterization("empty label image".to_string()));
    }

    let target = options.media.printable_width_dots;
    if rotated.width() == target {
        return Ok(rotated);
    }

    let height = (rotated.height() as f64 * target as f64 / rotated.width() as f64).round() as u32;
    debug!(
        from = rotated.width(),
        to = target,
        "Scaling label to printable width"
    );
    Ok(imageops::resize(
        &rotated,
        target,
        height.max(1),
        imageops::FilterType::Lanczos3,
    ))
}

/// Pack each image row into one print-head row, mirrored.
fn pack_rows(image: &GrayImage, model: &QlModel, media: &LabelMedia, cutoff: u8) -> Vec<Vec<u8>> {
    let head = model.device_width_dots as u32;
    let offset = head
        .saturating_sub(media.printable_width_dots)
        .saturating_sub(media.right_margin_dots);
    let bytes_per_row = model.bytes_per_row();

    (0..image.height())
        .map(|y| {
            let mut row = vec![0u8; bytes_per_row];
            for x in 0..image.width() {
                if image.get_pixel(x, y).0[0] > cutoff {
                    continue;
                }
                let pin = offset + x;
                if pin >= head {
                    continue;
                }
                // Mirror: image column 0 lands on the last pin
                let mirrored = (head - 1 - pin) as usize;
                row[mirrored / 8] |= 0x80 >> (mirrored % 8);
            }
            row
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
