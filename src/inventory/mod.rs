//! # Inventory Collaborator
//!
//! Asset records come from an external inventory system. This module defines
//! what the label workflows need from it and a session cache for the
//! expensive "all assets" lookup used to work out what is inside a box.
//!
//! ## Modules
//!
//! - [`cache`]: [`RecordCache`], contents aggregation
//! - [`json`]: [`JsonInventory`], a file-backed snapshot

pub mod cache;
pub mod json;

pub use cache::RecordCache;
pub use json::JsonInventory;

use serde::Deserialize;

use crate::error::LabelError;
use crate::tag::AssetId;

/// Model reference embedded in an asset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelRef {
    pub id: i64,
    pub name: String,
}

/// An asset as the inventory system reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryAsset {
    pub id: AssetId,
    pub asset_tag: String,
    pub name: String,
    pub model: ModelRef,
    /// Asset this one is checked out to (e.g. the box it sits in)
    #[serde(default)]
    pub assigned_to: Option<AssetId>,
    /// Free-text "Contents" field, one item per line
    #[serde(default)]
    pub contents_note: Option<String>,
}

/// What goes on a label for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub tag: String,
    pub name: String,
    pub id: AssetId,
    pub contents: Option<String>,
}

impl AssetRecord {
    pub fn from_asset(asset: &InventoryAsset, contents: Option<String>) -> Self {
        Self {
            tag: asset.asset_tag.clone(),
            name: asset.name.clone(),
            id: asset.id,
            contents,
        }
    }
}

/// Read-only access to the inventory system.
///
/// Calls are synchronous; failures are reported as [`LabelError::Lookup`].
pub trait Inventory {
    fn get_record_by_tag(&self, tag: &str) -> Result<InventoryAsset, LabelError>;

    fn get_all_records(&self) -> Result<Vec<InventoryAsset>, LabelError>;

    /// "Manufacturer Model" for a model ID
    fn get_model_description(&self, model_id: i64) -> Result<String, LabelError>;
}
