//! File-backed inventory snapshot.
//!
//! ```json
//! {
//!   "rows": [
//!     { "id": 10, "asset_tag": "EMF00010", "name": "Crate 1",
//!       "model": { "id": 9, "name": "Flight case" },
//!       "assigned_to": null, "contents_note": "Spare leads" }
//!   ],
//!   "models": [
//!     { "id": 9, "name": "Flight case", "manufacturer": "Thon" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{Inventory, InventoryAsset};
use crate::error::LabelError;

/// A model with its manufacturer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    pub id: i64,
    pub name: String,
    pub manufacturer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonInventory {
    pub rows: Vec<InventoryAsset>,
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

impl JsonInventory {
    pub fn from_json(json: &str) -> Result<Self, LabelError> {
        serde_json::from_str(json).map_err(|e| LabelError::Lookup(format!("Invalid inventory snapshot: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let json = fs::read_to_string(path)
            .map_err(|e| LabelError::Lookup(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

impl Inventory for JsonInventory {
    fn get_record_by_tag(&self, tag: &str) -> Result<InventoryAsset, LabelError> {
        self.rows
            .iter()
            .find(|asset| asset.asset_tag == tag)
            .cloned()
            .ok_or_else(|| LabelError::Lookup(format!("No asset with tag {}", tag)))
    }

    fn get_all_records(&self) -> Result<Vec<InventoryAsset>, LabelError> {
        Ok(self.rows.clone())
    }

    fn get_model_description(&self, model_id: i64) -> Result<String, LabelError> {
        self.models
            .iter()
            .find(|model| model.id == model_id)
            .map(|model| format!("{} {}", model.manufacturer, model.name))
            .ok_or_else(|| LabelError::Lookup(format!("No model with id {}", model_id)))
    }
}
