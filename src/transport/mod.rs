//! # Printer Transport Layer
//!
//! This module provides communication backends for sending jobs to printers.
//!
//! ## Available Transports
//!
//! | Transport | Printer | Confirmation |
//! |-----------|---------|--------------|
//! | [`RawSpoolTransport`] | Zebra (ZPL) via CUPS raw queue | submitted to spooler |
//! | [`UsbRasterTransport`] | Brother QL via USB | status polling |
//!
//! [`PrinterBackend`] picks one from the printer's queue name.

pub mod poll;
pub mod spool;
pub mod usb;

pub use poll::{CompletionTracker, PollSettings, RasterSession, SessionState, StatusChannel};
pub use spool::{RawSpoolTransport, list_queues};
pub use usb::UsbRasterTransport;

use tracing::info;

use crate::error::LabelError;
use crate::printer::{QlModel, is_zebra_printer};

/// How far a sent job is known to have got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by a spooler; printing is not observed
    Submitted,
    /// Printer reported the job as printed
    Confirmed,
    /// Sent, but the printer did not confirm in time
    Unconfirmed,
}

/// Anything that can deliver a finished job to a printer.
pub trait PrinterTransport {
    /// Send one complete job.
    fn send_raw(&self, data: &[u8]) -> Result<Delivery, LabelError>;
}

/// Which printer family a queue name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterBackend {
    Zebra { printer: String },
    BrotherQl,
}

impl PrinterBackend {
    pub fn classify(printer_name: &str) -> Self {
        if is_zebra_printer(printer_name) {
            PrinterBackend::Zebra {
                printer: printer_name.to_string(),
            }
        } else {
            PrinterBackend::BrotherQl
        }
    }

    /// Classify `printer_name` and build its transport.
    pub fn for_printer(printer_name: &str) -> Box<dyn PrinterTransport> {
        Self::classify(printer_name).into_transport()
    }

    /// Build the transport for this backend. Called once per run.
    pub fn into_transport(self) -> Box<dyn PrinterTransport> {
        info!(backend = ?self, "Selected printer backend");
        match self {
            PrinterBackend::Zebra { printer } => Box::new(RawSpoolTransport::new(printer)),
            PrinterBackend::BrotherQl => Box::new(UsbRasterTransport::new(QlModel::QL800)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            PrinterBackend::classify("Zebra_Technologies_ZTC_GK420d"),
            PrinterBackend::Zebra {
                printer: "Zebra_Technologies_ZTC_GK420d".into()
            }
        );
        assert_eq!(
            PrinterBackend::classify("Brother_QL-800"),
            PrinterBackend::BrotherQl
        );
    }
}
