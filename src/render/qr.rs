//! QR codes as SVG fragments.
//!
//! The code is emitted as vector paths so it scales losslessly with the rest
//! of the label when the document is rasterized.

use std::fmt::Write;

use qrcode::{Color, EcLevel, QrCode};
use xmltree::Element;

use crate::error::LabelError;

/// Size of one QR module in SVG user units
pub const QR_MODULE_SIZE: usize = 8;

/// Quiet zone around the code, in modules
pub const QR_BORDER: usize = 1;

/// A rendered QR code ready to be appended to an SVG group
#[derive(Debug, Clone, PartialEq)]
pub struct QrFragment {
    /// Elements to append (a single `<path>`)
    pub elements: Vec<Element>,
    /// Modules per side, excluding the border
    pub modules: usize,
}

impl QrFragment {
    /// Side length in user units, border included
    pub fn size(&self) -> usize {
        (self.modules + 2 * QR_BORDER) * QR_MODULE_SIZE
    }
}

/// Encode `data` at error-correction level M.
///
/// Dark modules are merged into horizontal runs, one subpath per run.
pub fn make_qr_fragment(data: &str) -> Result<QrFragment, LabelError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| LabelError::QrEncoding(format!("QR code generation failed: {}", e)))?;

    let width = code.width();
    let colors = code.to_colors();
    let mut d = String::new();

    for y in 0..width {
        let mut x = 0;
        while x < width {
            if colors[y * width + x] != Color::Dark {
                x += 1;
                continue;
            }
            let start = x;
            while x < width && colors[y * width + x] == Color::Dark {
                x += 1;
            }
            let run = (x - start) * QR_MODULE_SIZE;
            let _ = write!(
                d,
                "M{} {}h{}v{}h-{}z",
                (start + QR_BORDER) * QR_MODULE_SIZE,
                (y + QR_BORDER) * QR_MODULE_SIZE,
                run,
                QR_MODULE_SIZE,
                run
            );
        }
    }

    let mut path = Element::new("path");
    path.attributes.insert("d".to_string(), d);
    path.attributes.insert("fill".to_string(), "#000000".to_string());

    Ok(QrFragment {
        elements: vec![path],
        modules: width,
    })
}
