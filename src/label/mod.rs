//! # Label Formatting
//!
//! Turns inventory records into per-label [`FieldSet`]s.
//!
//! ## Label Kinds
//!
//! | Kind | Printer | Template | Stock |
//! |------|---------|----------|-------|
//! | Asset | Zebra | `ASSET.ZPL` | 50.8x25.4mm |
//! | Box (asset-backed) | Zebra | `BOX.ZPL` | 76.2x50.8mm |
//! | Box (sheet-backed) | Brother QL | `box.svg` | 62mm continuous |
//!
//! ## ZPL Field Slots
//!
//! ```text
//! ^FN1  asset name
//! ^FN2  asset tag
//! ^FN3  QR data: "QA," + asset URL
//! ^FN4  contents, up to 8 lines joined with \&
//! ```

mod boxes;
mod fields;
mod text;

pub use boxes::*;
pub use fields::*;
pub use text::*;

use crate::inventory::AssetRecord;

/// Maximum contents lines in the ZPL box template's field block
pub const ZPL_CONTENTS_LINES: usize = 8;

/// Which template an asset-backed label uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Asset,
    Box,
}

impl LabelKind {
    /// Name of the stored ZPL template
    pub fn template_name(self) -> &'static str {
        match self {
            LabelKind::Asset => "asset",
            LabelKind::Box => "box",
        }
    }

    /// Label stock the operator must load before printing
    pub fn stock(self) -> &'static str {
        match self {
            LabelKind::Asset => "50.8x25.4mm",
            LabelKind::Box => "76.2x50.8mm",
        }
    }

    /// Whether box contents must be looked up
    pub fn wants_contents(self) -> bool {
        matches!(self, LabelKind::Box)
    }
}

impl std::str::FromStr for LabelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(LabelKind::Asset),
            "box" => Ok(LabelKind::Box),
            other => Err(format!("Unknown template '{}'. Use 'asset' or 'box'", other)),
        }
    }
}

/// URL of an asset's page in the inventory web UI.
pub fn asset_url(inventory_url: &str, id: i64) -> String {
    format!("{}/hardware/{}", inventory_url.trim_end_matches('/'), id)
}

/// ZPL field set for one asset-backed label.
pub fn asset_fields(record: &AssetRecord, inventory_url: &str) -> FieldSet {
    FieldSet::new()
        .with(1, sanitize_zpl(&record.name))
        .with(2, sanitize_zpl(&record.tag))
        .with(3, format!("QA,{}", asset_url(inventory_url, record.id)))
        .with(
            4,
            sanitize_zpl(&format_textbox(
                record.contents.as_deref(),
                ZPL_CONTENTS_LINES,
            )),
        )
}
