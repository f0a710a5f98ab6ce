//! # Rendering Module
//!
//! Everything between a [`FieldSet`](crate::label::FieldSet) and a bitmap
//! for the raster printer.
//!
//! ## Modules
//!
//! - [`svg`]: SVG templates and text/QR slot substitution
//! - [`qr`]: QR codes as vector SVG fragments
//! - [`compositor`]: SVG to fixed-height grayscale bitmap
//!
//! ## Usage Example
//!
//! ```no_run
//! use labelprint::label::FieldSet;
//! use labelprint::render::{RasterCompositor, SvgTemplate, svg_from_template};
//!
//! let template = SvgTemplate::load("templates/box.svg".as_ref())?;
//! let fields = FieldSet::new()
//!     .with("boxid", "Box 42")
//!     .with("qrcode", "https://s.emf.camp/i/42");
//!
//! let document = svg_from_template(&template, &fields)?;
//! let bitmap = RasterCompositor::new().rasterize(&document, 696)?;
//! assert_eq!(bitmap.height(), 696);
//! # Ok::<(), labelprint::LabelError>(())
//! ```

pub mod compositor;
pub mod qr;
pub mod svg;

pub use compositor::{DEFAULT_TARGET_HEIGHT, RasterCompositor};
pub use qr::{QrFragment, make_qr_fragment};
pub use svg::{SvgDocument, SvgTemplate, svg_from_template};
