//! # labelprint - Asset and Storage Label Printing
//!
//! labelprint prints inventory labels on two families of label printer:
//!
//! - **Zebra** printers speaking ZPL, fed through a CUPS raw queue. Label
//!   layouts are stored on the printer; jobs only carry field values.
//! - **Brother QL** raster printers over USB. Labels are drawn from an SVG
//!   template, rasterized locally and sent as a bitmap.
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelprint::{
//!     label::{FieldSet, PrintJob},
//!     protocol::zpl,
//!     transport::{PrinterTransport, RawSpoolTransport},
//! };
//!
//! let mut job = PrintJob::new();
//! job.push(
//!     FieldSet::new()
//!         .with(1, "Core switch")
//!         .with(2, "EMF00020")
//!         .with(3, "QA,https://inventory.example/hardware/20"),
//!     2,
//! );
//!
//! let transport = RawSpoolTransport::new("Zebra_Technologies_ZTC_GK420d");
//! transport.send_raw(&zpl::encode_job("asset", &job))?;
//! # Ok::<(), labelprint::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tag`] | Asset tag ↔ ID conversion and ID list expressions |
//! | [`label`] | Field sets for asset and box labels |
//! | [`render`] | SVG templates, QR fragments, rasterization |
//! | [`protocol`] | ZPL and Brother QL raster command builders |
//! | [`transport`] | Spooler and USB backends, status polling |
//! | [`printer`] | Printer models and label media |
//! | [`inventory`] | Inventory lookups and contents aggregation |
//! | [`sheet`] | Storage spreadsheet rows |
//! | [`template`] | Template directory and ZPL upload |
//! | [`job`] | Asset and box label sessions |
//! | [`config`] | Environment configuration |
//! | [`logging`] | Log subscriber setup |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod inventory;
pub mod job;
pub mod label;
pub mod logging;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod sheet;
pub mod tag;
pub mod template;
pub mod transport;

// Re-exports for convenience
pub use config::Config;
pub use error::{LabelError, TransportError};
pub use tag::TagCodec;
pub use transport::{Delivery, PrinterBackend, PrinterTransport};
