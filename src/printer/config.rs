//! # Printer Configuration
//!
//! Hardware specifications for the supported printers and label stock.
//!
//! ## Supported Printers
//!
//! | Family | Model | Interface | Language |
//! |--------|-------|-----------|----------|
//! | Zebra | any ZPL II desktop printer | CUPS raw queue | ZPL |
//! | Brother | QL-800 | USB | QL raster |
//!
//! ## Usage
//!
//! ```
//! use labelprint::printer::{QlModel, LabelMedia};
//!
//! let model = QlModel::QL800;
//! let media = LabelMedia::CONTINUOUS_62;
//! assert_eq!(model.bytes_per_row(), 90);
//! assert_eq!(media.printable_width_dots, 696);
//! ```

/// CUPS name prefix of Zebra printers
const ZEBRA_PREFIX: &str = "zebra_technologies";

/// Whether a CUPS queue name belongs to a Zebra printer.
///
/// CUPS names auto-configured Zebra queues after the USB manufacturer
/// string, e.g. `Zebra_Technologies_ZTC_GK420d`.
pub fn is_zebra_printer(printer_name: &str) -> bool {
    printer_name.to_lowercase().starts_with(ZEBRA_PREFIX)
}

/// # Brother QL Model
///
/// ## Physical Properties
///
/// - **device_width_dots**: Number of print head pins
///
/// ## Calculations
///
/// ```text
/// bytes_per_row = device_width_dots / 8
///
/// For QL-800:
///   720 pins / 8 = 90 bytes per raster line
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QlModel {
    /// Printer model name
    pub name: &'static str,

    /// USB product ID
    pub usb_product_id: u16,

    /// Print head width in dots
    pub device_width_dots: u16,

    /// Whether `ESC i a` (mode switch) is understood
    pub mode_switch: bool,
}

impl QlModel {
    /// # Brother QL-800
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Print head | 720 dots |
    /// | Resolution | 300 DPI |
    /// | Max width | 62mm |
    /// | Cutter | Auto-cutter |
    pub const QL800: Self = Self {
        name: "QL-800",
        usb_product_id: 0x209b,
        device_width_dots: 720,
        mode_switch: true,
    };

    /// Bytes per raster line
    #[inline]
    pub fn bytes_per_row(&self) -> usize {
        (self.device_width_dots as usize).div_ceil(8)
    }
}

impl Default for QlModel {
    fn default() -> Self {
        Self::QL800
    }
}

/// Label media loaded in a QL printer.
///
/// ## Print Area (62mm continuous)
///
/// ```text
/// ├─ 12 ─┼────────── 696 printable ──────────┼─ 12 ─┤
/// │      │                                    │      │  720 pins
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LabelMedia {
    /// Tape width in millimeters
    pub width_mm: u8,

    /// Label length in millimeters (0 for continuous)
    pub length_mm: u8,

    /// Printable width in dots
    pub printable_width_dots: u32,

    /// Unprinted dots at the right edge of the print head
    pub right_margin_dots: u32,

    /// Feed margin in dots
    pub feed_margin_dots: u16,
}

impl LabelMedia {
    /// 62mm continuous tape (DK-22205)
    pub const CONTINUOUS_62: Self = Self {
        width_mm: 62,
        length_mm: 0,
        printable_width_dots: 696,
        right_margin_dots: 12,
        feed_margin_dots: 35,
    };

    pub fn is_continuous(&self) -> bool {
        self.length_mm == 0
    }

    /// Label stock description for operator prompts
    pub fn stock(&self) -> String {
        if self.is_continuous() {
            format!("{}mm continuous", self.width_mm)
        } else {
            format!("{}x{}mm", self.width_mm, self.length_mm)
        }
    }
}

impl Default for LabelMedia {
    fn default() -> Self {
        Self::CONTINUOUS_62
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ql800_dimensions() {
        let model = QlModel::QL800;
        assert_eq!(model.device_width_dots, 720);
        assert_eq!(model.bytes_per_row(), 90);
    }

    #[test]
    fn test_media_fits_head() {
        let media = LabelMedia::CONTINUOUS_62;
        assert!(
            media.printable_width_dots + media.right_margin_dots
                <= QlModel::QL800.device_width_dots as u32
        );
        assert_eq!(media.stock(), "62mm continuous");
    }

    #[test]
    fn test_is_zebra_printer() {
        assert!(is_zebra_printer("Zebra_Technologies_ZTC_GK420d"));
        assert!(is_zebra_printer("zebra_technologies_zd420"));
        assert!(!is_zebra_printer("Brother_QL-800"));
        assert!(!is_zebra_printer("my_zebra_technologies"));
    }
}
