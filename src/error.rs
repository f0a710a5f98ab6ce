//! # Error Types
//!
//! This module defines error types used throughout the labelprint library.
//!
//! Every variant of [`LabelError`] aborts the current print job but never the
//! process: the caller reports the message and may start a fresh job.
//! Recoverable conditions (unmatched template fields, unparseable status
//! frames, excess content lines) are logged where they happen and never
//! reach this type.

use thiserror::Error;

/// Main error type for labelprint operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Tag or ID string that is not a non-negative decimal number
    #[error("Malformed tag: '{0}'")]
    MalformedTag(String),

    /// Negative asset ID passed to the tag encoder
    #[error("Invalid asset ID: {0}")]
    InvalidId(i64),

    /// Label field exceeds the space available on the label
    #[error("{field} too long ({len} > {max} characters)")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// Contents did not fit and strict truncation was requested
    #[error("Contents truncated: {lines} lines, only {max} fit on the label")]
    ContentsTruncated { lines: usize, max: usize },

    /// SVG template has no `qrcode` group to receive the QR fragment
    #[error("Template '{0}' has no QR code slot")]
    TemplateMissingQrSlot(String),

    /// Template could not be found, read or parsed
    #[error("Template error: {0}")]
    Template(String),

    /// QR code generation failed (usually: data too long)
    #[error("QR code error: {0}")]
    QrEncoding(String),

    /// SVG could not be rendered to a bitmap
    #[error("Rasterization error: {0}")]
    Rasterization(String),

    /// No attachable raster printer found on the USB bus
    #[error("No printer found")]
    NoDeviceFound,

    /// Sending the payload to the printer failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Inventory or spreadsheet collaborator failed
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a [`PrinterTransport`](crate::transport::PrinterTransport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// The raw-queue spooler could not be run or exited unsuccessfully
    #[error("spooler failed for printer '{printer}': {status}")]
    SpoolerFailed { printer: String, status: String },

    /// USB-level failure (open, claim, read or write)
    #[error("USB error: {0}")]
    Usb(String),

    /// The device accepted fewer bytes than were sent
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

impl From<rusb::Error> for TransportError {
    fn from(e: rusb::Error) -> Self {
        TransportError::Usb(e.to_string())
    }
}
