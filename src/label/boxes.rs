//! Storage-box label fields.
//!
//! Box labels are printed from the SVG template on 62mm continuous stock.
//! The template has fixed-size text slots, so every value is bounded before
//! it reaches the renderer:
//!
//! | Field | Limit |
//! |-------|-------|
//! | Box ID | 6 characters |
//! | Box name | 10 characters |
//! | QR URL | 30 characters |
//! | Contents | 4 lines of 65 columns |

use tracing::warn;

use super::fields::FieldSet;
use super::text::wrap;
use crate::error::LabelError;

pub const MAX_BOX_ID_LEN: usize = 6;
pub const MAX_BOX_NAME_LEN: usize = 10;
pub const MAX_URL_LEN: usize = 30;
pub const CONTENTS_COLUMNS: usize = 65;
pub const CONTENTS_LINES: usize = 4;

/// Template node that receives the QR code.
pub const QR_FIELD: &str = "qrcode";

/// What to do when contents overflow the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationPolicy {
    /// Keep what fits and log a warning
    #[default]
    Lenient,
    /// Fail with [`LabelError::ContentsTruncated`]
    Strict,
}

/// Validated field values for one box label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxLabel {
    pub box_id: String,
    pub box_name: String,
    pub url: String,
    pub contents: [String; CONTENTS_LINES],
}

impl BoxLabel {
    /// Validate and lay out box label values.
    pub fn prepare(
        box_id: &str,
        box_name: &str,
        url: &str,
        contents: &str,
        policy: TruncationPolicy,
    ) -> Result<Self, LabelError> {
        check_len("Box ID", box_id, MAX_BOX_ID_LEN)?;
        check_len("Box name", box_name, MAX_BOX_NAME_LEN)?;
        check_len("URL", url, MAX_URL_LEN)?;

        let wrapped = wrap(contents, CONTENTS_COLUMNS);
        if wrapped.len() > CONTENTS_LINES {
            if policy == TruncationPolicy::Strict {
                return Err(LabelError::ContentsTruncated {
                    lines: wrapped.len(),
                    max: CONTENTS_LINES,
                });
            }
            warn!(box_id, lines = wrapped.len(), "Contents truncated!");
        }

        let mut lines = wrapped.into_iter();
        let contents = std::array::from_fn(|_| lines.next().unwrap_or_default());

        Ok(Self {
            box_id: box_id.to_string(),
            box_name: box_name.to_string(),
            url: url.to_string(),
            contents,
        })
    }

    /// Field set keyed by the SVG template's node identifiers.
    pub fn fields(&self) -> FieldSet {
        let mut fields = FieldSet::new()
            .with("boxid", format!("Box {}", self.box_id))
            .with("boxname", self.box_name.as_str())
            .with(QR_FIELD, self.url.as_str());
        for (i, line) in self.contents.iter().enumerate() {
            fields.insert(format!("contents{}", i + 1), line.as_str());
        }
        fields
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), LabelError> {
    let len = value.chars().count();
    if len > max {
        return Err(LabelError::FieldTooLong { field, len, max });
    }
    Ok(())
}
