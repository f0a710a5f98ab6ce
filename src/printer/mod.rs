//! # Printer Module
//!
//! This module provides printer-specific configurations and utilities.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware specifications and label media

pub mod config;

pub use config::{LabelMedia, QlModel, is_zebra_printer};
