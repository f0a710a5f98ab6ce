//! # Brother QL Raster Protocol
//!
//! - [`commands`]: Command builders (`ESC i ...`, raster lines)
//! - [`raster`]: Bitmap to raster job conversion
//! - [`status`]: 32-byte status frame decoding

pub mod commands;
pub mod raster;
pub mod status;

pub use raster::{RasterJob, RasterOptions, Rotation};
pub use status::{DeviceStatusEvent, PhaseType, StatusFrame, StatusType};
