//! # Asset Tags
//!
//! Bijective mapping between human-facing asset tags and integer asset IDs.
//!
//! A tag is the organization prefix followed by the ID zero-padded to five
//! digits:
//!
//! ```text
//! prefix "EMF"   id 42     →  "EMF00042"
//! prefix ""      id 123456 →  "123456"     (wider IDs are not truncated)
//! ```
//!
//! ## ID Expressions
//!
//! Operators type comma-separated lists of tags, bare IDs and inclusive
//! ranges:
//!
//! ```
//! use labelprint::tag::TagCodec;
//!
//! let codec = TagCodec::new("EMF");
//! let ids: Vec<i64> = codec.parse_id_list("3-5,EMF00009").unwrap().iter().collect();
//! assert_eq!(ids, vec![3, 4, 5, 9]);
//! ```

use std::ops::RangeInclusive;

use crate::error::LabelError;

/// Zero-padding width of the numeric part of a tag
pub const TAG_DIGITS: usize = 5;

/// Integer asset ID as used by the inventory service
pub type AssetId = i64;

/// Encodes and decodes tags for one organization prefix.
///
/// The prefix is process-wide configuration, read-only after startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCodec {
    prefix: String,
}

impl TagCodec {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Decode a tag (or bare ID) to an asset ID.
    ///
    /// The prefix is optional: `"EMF00042"` and `"42"` both decode to 42.
    pub fn decode(&self, tag: &str) -> Result<AssetId, LabelError> {
        let trimmed = tag.trim();
        let digits = trimmed.strip_prefix(self.prefix.as_str()).unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LabelError::MalformedTag(tag.to_string()));
        }

        digits
            .parse::<AssetId>()
            .map_err(|_| LabelError::MalformedTag(tag.to_string()))
    }

    /// Encode an asset ID as a tag.
    pub fn encode(&self, id: AssetId) -> Result<String, LabelError> {
        if id < 0 {
            return Err(LabelError::InvalidId(id));
        }
        Ok(format!("{}{:0width$}", self.prefix, id, width = TAG_DIGITS))
    }

    /// Parse a comma-separated list of tags, IDs and `start-end` ranges.
    ///
    /// Every part is validated up front; iteration itself cannot fail.
    /// Descending ranges are accepted and yield nothing.
    pub fn parse_id_list(&self, expr: &str) -> Result<IdList, LabelError> {
        let parts = expr
            .split(',')
            .map(|part| self.parse_part(part))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IdList { parts })
    }

    fn parse_part(&self, part: &str) -> Result<RangeInclusive<AssetId>, LabelError> {
        if let Ok(id) = self.decode(part) {
            return Ok(id..=id);
        }

        // The prefix itself may contain '-', so try every split point.
        for (pos, _) in part.match_indices('-') {
            let (start, end) = (&part[..pos], &part[pos + 1..]);
            if let (Ok(start), Ok(end)) = (self.decode(start), self.decode(end)) {
                return Ok(start..=end);
            }
        }

        Err(LabelError::MalformedTag(part.to_string()))
    }
}

/// A parsed ID expression.
///
/// Cheap to clone and restartable: each call to [`IdList::iter`] walks the
/// parts from the beginning. Ranges are never materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList {
    parts: Vec<RangeInclusive<AssetId>>,
}

impl IdList {
    pub fn iter(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.parts.iter().flat_map(|range| range.clone())
    }

    /// Number of IDs the list yields (duplicates included)
    pub fn len(&self) -> usize {
        self.parts
            .iter()
            .map(|r| {
                if r.end() < r.start() {
                    0
                } else {
                    (r.end() - r.start()) as usize + 1
                }
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for IdList {
    type Item = AssetId;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<RangeInclusive<AssetId>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter().flatten()
    }
}

// ============================================================================
// TESTS
// ============================================================================
