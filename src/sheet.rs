//! # Storage Spreadsheet
//!
//! Box labels are driven by a storage spreadsheet, one row per box:
//!
//! | Column | 0 | 1 | 2 | 3 | 4 | 5 |
//! |--------|---|---|---|---|---|---|
//! | Content | box ID | name | - | - | contents | print flag |
//!
//! Only rows with a box ID and a print flag of `y` are printed. The QR code
//! on each label points at `<box url base>/<box id>`.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::LabelError;

/// Default base for box QR URLs
pub const DEFAULT_BOX_URL_BASE: &str = "https://s.emf.camp/i";

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_CONTENTS: usize = 4;
const COL_PRINT: usize = 5;

/// One box from the spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxRow {
    /// Normalized decimal ID (leading zeros dropped)
    pub box_id: String,
    pub box_name: String,
    pub qr_url: String,
    pub contents: String,
    pub print_flag: bool,
}

impl BoxRow {
    /// Parse one raw row. Rows that are too short, have no ID, or have a
    /// non-numeric ID yield `None`.
    pub fn from_values(row: &[String], url_base: &str) -> Option<Self> {
        if row.len() <= COL_PRINT || row[COL_ID].is_empty() {
            return None;
        }

        let id: u64 = match row[COL_ID].trim().parse() {
            Ok(id) => id,
            Err(_) => {
                warn!(box_id = %row[COL_ID], "Skipping row with non-numeric box ID");
                return None;
            }
        };

        Some(Self {
            box_id: id.to_string(),
            box_name: row[COL_NAME].clone(),
            qr_url: format!("{}/{}", url_base.trim_end_matches('/'), id),
            contents: row[COL_CONTENTS].clone(),
            print_flag: row[COL_PRINT].eq_ignore_ascii_case("y"),
        })
    }
}

/// Rows to print, in sheet order.
pub fn rows_from_values(values: &[Vec<String>], url_base: &str) -> Vec<BoxRow> {
    let rows: Vec<BoxRow> = values
        .iter()
        .filter_map(|row| BoxRow::from_values(row, url_base))
        .filter(|row| row.print_flag)
        .collect();
    debug!(total = values.len(), selected = rows.len(), "Filtered sheet rows");
    rows
}

/// Anything that can list the boxes to label.
pub trait SheetSource {
    fn box_rows(&self) -> Result<Vec<BoxRow>, LabelError>;
}

/// A spreadsheet range exported as a JSON array of string arrays.
#[derive(Debug, Clone)]
pub struct JsonSheet {
    values: Vec<Vec<String>>,
    url_base: String,
}

impl JsonSheet {
    pub fn from_json(json: &str, url_base: impl Into<String>) -> Result<Self, LabelError> {
        let values = serde_json::from_str(json)
            .map_err(|e| LabelError::Lookup(format!("Invalid sheet export: {}", e)))?;
        Ok(Self {
            values,
            url_base: url_base.into(),
        })
    }

    pub fn load(path: &Path, url_base: impl Into<String>) -> Result<Self, LabelError> {
        let json = fs::read_to_string(path)
            .map_err(|e| LabelError::Lookup(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json, url_base)
    }
}

impl SheetSource for JsonSheet {
    fn box_rows(&self) -> Result<Vec<BoxRow>, LabelError> {
        Ok(rows_from_values(&self.values, &self.url_base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHEET: &str = include_str!("../tests/fixtures/sheet.json");

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_only_flagged_rows() {
        let sheet = JsonSheet::from_json(SHEET, DEFAULT_BOX_URL_BASE).unwrap();
        let ids: Vec<String> = sheet.box_rows().unwrap().into_iter().map(|r| r.box_id).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_row_fields() {
        let parsed = BoxRow::from_values(
            &row(&["42", "Cables", "A", "NOC", "IEC leads", "Y"]),
            "https://s.emf.camp/i/",
        )
        .unwrap();
        assert_eq!(
            parsed,
            BoxRow {
                box_id: "42".into(),
                box_name: "Cables".into(),
                qr_url: "https://s.emf.camp/i/42".into(),
                contents: "IEC leads".into(),
                print_flag: true,
            }
        );
    }

    #[test]
    fn test_short_and_empty_rows() {
        assert_eq!(BoxRow::from_values(&row(&["1", "a", "", "", "x"]), "u"), None);
        assert_eq!(BoxRow::from_values(&row(&["", "a", "", "", "x", "y"]), "u"), None);
        assert_eq!(BoxRow::from_values(&row(&["x7", "a", "", "", "x", "y"]), "u"), None);
    }

    #[test]
    fn test_invalid_export() {
        assert!(matches!(
            JsonSheet::from_json("{}", DEFAULT_BOX_URL_BASE),
            Err(LabelError::Lookup(_))
        ));
    }
}
