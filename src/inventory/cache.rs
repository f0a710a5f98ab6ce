//! Per-session memoization of inventory lookups.
//!
//! The inventory cannot be asked which assets are checked out to a given
//! box, so the full asset list is fetched once and searched locally. Model
//! descriptions are cached the same way.

use std::collections::HashMap;

use tracing::debug;

use super::{Inventory, InventoryAsset};
use crate::error::LabelError;
use crate::tag::AssetId;

#[derive(Debug, Default)]
pub struct RecordCache {
    all_records: Option<Vec<InventoryAsset>>,
    model_descriptions: HashMap<i64, String>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// All assets, fetched on first use.
    pub fn all_records(&mut self, inventory: &dyn Inventory) -> Result<&[InventoryAsset], LabelError> {
        if self.all_records.is_none() {
            let records = inventory.get_all_records()?;
            debug!(count = records.len(), "Fetched all inventory records");
            self.all_records = Some(records);
        }
        Ok(self.all_records.as_deref().unwrap_or_default())
    }

    pub fn model_description(&mut self, inventory: &dyn Inventory, model_id: i64) -> Result<String, LabelError> {
        if let Some(description) = self.model_descriptions.get(&model_id) {
            return Ok(description.clone());
        }
        let description = inventory.get_model_description(model_id)?;
        self.model_descriptions.insert(model_id, description.clone());
        Ok(description)
    }

    /// Contents listing for a box asset.
    ///
    /// ```text
    /// 3 x Cisco WS-C2960
    /// 1 x APC Smart-UPS       ← assets checked out to the box, by model
    /// Spare patch leads       ← lines of the box's own contents note
    /// ```
    pub fn contents_of(&mut self, inventory: &dyn Inventory, asset: &InventoryAsset) -> Result<String, LabelError> {
        let mut groups: Vec<(i64, usize)> = Vec::new();
        for child in self.children(inventory, asset.id)? {
            match groups.iter_mut().find(|(model, _)| *model == child) {
                Some((_, count)) => *count += 1,
                None => groups.push((child, 1)),
            }
        }

        let mut lines = Vec::with_capacity(groups.len());
        for (model_id, count) in groups {
            lines.push(format!("{} x {}", count, self.model_description(inventory, model_id)?));
        }

        if let Some(note) = asset.contents_note.as_deref().filter(|n| !n.is_empty()) {
            lines.extend(unescape_html(note).split('\n').map(str::to_string));
        }

        Ok(lines.join("\n"))
    }

    /// Model IDs of assets checked out to `parent`, in inventory order
    fn children(&mut self, inventory: &dyn Inventory, parent: AssetId) -> Result<Vec<i64>, LabelError> {
        Ok(self
            .all_records(inventory)?
            .iter()
            .filter(|a| a.assigned_to == Some(parent))
            .map(|a| a.model.id)
            .collect())
    }
}

/// Decode the entities the inventory web UI stores in free-text fields.
fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let decoded = rest.find(';').and_then(|end| {
            let ch = match &rest[1..end] {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                entity => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end + 1))
        });

        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
