//! # Printer Protocols
//!
//! Wire formats for the two supported printer families.
//!
//! ## Module Structure
//!
//! - [`zpl`]: ZPL II batch jobs for Zebra printers (stored-format recall)
//! - [`ql`]: Raster commands and status frames for Brother QL printers
//!
//! ## Usage Example
//!
//! ```
//! use labelprint::label::FieldSet;
//! use labelprint::protocol::zpl;
//!
//! let fields = FieldSet::new().with(1, "Foo").with(2, "BOX001");
//! let job = zpl::encode("BOX", [&fields]);
//! assert!(job.starts_with(b"^XA\n^XFE:BOX.ZPL^FS\n"));
//! ```

pub mod ql;
pub mod zpl;
