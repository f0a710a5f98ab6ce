//! # ZPL Batch Encoding
//!
//! Builds print jobs for Zebra printers that recall a template stored in
//! printer memory and fill its numbered fields.
//!
//! ## Label Block
//!
//! Every label instance is one self-contained block:
//!
//! ```text
//! ^XA                     start of label
//! ^XFE:ASSET.ZPL^FS       recall stored format
//! ^FN1^FDCrate 7^FS       field writes, one per value
//! ^FN2^FDEMF00042^FS
//! ^PQ1                    print exactly one copy
//! ^XZ                     end of label
//! ```
//!
//! Copies are emitted as repeated blocks rather than `^PQn` so that a batch
//! prints in exactly the order given.
//!
//! ## Reference
//!
//! ZPL II Programming Guide: `^XA`, `^XF`, `^FN`, `^FD`, `^FS`, `^PQ`, `^XZ`.

use crate::label::{FieldKey, FieldSet, PrintJob};

/// File extension of stored formats on the printer
const TEMPLATE_EXT: &str = ".ZPL";

/// # Start Format (^XA)
#[inline]
pub fn start_label() -> Vec<u8> {
    b"^XA\n".to_vec()
}

/// # End Format (^XZ)
#[inline]
pub fn end_label() -> Vec<u8> {
    b"^XZ\n".to_vec()
}

/// # Recall Format (^XF)
///
/// Recalls a format previously stored in printer memory (drive `E:`) with
/// `^DF`. The name is upper-cased and gets a `.ZPL` extension if it has none.
///
/// ```
/// use labelprint::protocol::zpl;
///
/// assert_eq!(zpl::recall_template("box"), b"^XFE:BOX.ZPL^FS\n");
/// ```
pub fn recall_template(name: &str) -> Vec<u8> {
    format!("^XFE:{}^FS\n", stored_name(name)).into_bytes()
}

/// # Field Number + Field Data (^FN / ^FD)
///
/// Writes `value` into field slot `key` of the recalled format.
pub fn field(key: &FieldKey, value: &str) -> Vec<u8> {
    format!("^FN{}^FD{}^FS\n", key, value).into_bytes()
}

/// # Print Quantity (^PQ)
#[inline]
pub fn print_quantity(copies: u32) -> Vec<u8> {
    format!("^PQ{}\n", copies).into_bytes()
}

/// Stored-format name as it appears on the printer: `BOX.ZPL`
pub fn stored_name(name: &str) -> String {
    let upper = name.to_uppercase();
    if upper.ends_with(TEMPLATE_EXT) {
        upper
    } else {
        format!("{}{}", upper, TEMPLATE_EXT)
    }
}

/// Encode one label block per field set, in order.
pub fn encode<'a>(template_name: &str, items: impl IntoIterator<Item = &'a FieldSet>) -> Vec<u8> {
    let recall = recall_template(template_name);
    let mut data = Vec::new();

    for fields in items {
        data.extend(start_label());
        data.extend(&recall);
        for (key, value) in fields.iter() {
            data.extend(field(key, value));
        }
        data.extend(print_quantity(1));
        data.extend(end_label());
    }

    data
}

/// Encode a [`PrintJob`], expanding copies.
pub fn encode_job(template_name: &str, job: &PrintJob) -> Vec<u8> {
    encode(template_name, job.labels())
}

// ============================================================================
// TESTS
// ============================================================================
