//! # USB Raster Transport
//!
//! Talks to Brother QL printers directly over USB bulk endpoints.
//!
//! ## Device Discovery
//!
//! | Criterion | Value |
//! |-----------|-------|
//! | Vendor ID | `0x04f9` (Brother) |
//! | Interface class | `0x07` (printer) |
//! | Endpoints | one bulk OUT, one bulk IN |
//!
//! The first matching device is used. Each [`send_raw`] opens the device,
//! claims the printer interface, runs one [`RasterSession`] and releases the
//! interface again when the handle is dropped.
//!
//! ## Permissions (Linux)
//!
//! The user needs write access to the device node, e.g. via a udev rule:
//!
//! ```text
//! SUBSYSTEM=="usb", ATTR{idVendor}=="04f9", MODE="0666"
//! ```
//!
//! [`send_raw`]: super::PrinterTransport::send_raw

use std::time::Duration;

use rusb::{Device, DeviceHandle, Direction, GlobalContext, TransferType, UsbContext};
use tracing::{debug, info, warn};

use super::poll::{PollSettings, RasterSession, SessionState, StatusChannel};
use super::{Delivery, PrinterTransport};
use crate::error::{LabelError, TransportError};
use crate::printer::QlModel;
use crate::protocol::ql::status::FRAME_LEN;

/// Brother Industries USB vendor ID
pub const BROTHER_VENDOR_ID: u16 = 0x04f9;

/// USB interface class for printers
const PRINTER_CLASS: u8 = 0x07;

/// Timeout for the single payload write
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint addresses of a printer interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PrinterEndpoints {
    interface: u8,
    bulk_in: u8,
    bulk_out: u8,
}

/// A Brother printer interface found on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate<D> {
    device: D,
    product_id: u16,
    endpoints: PrinterEndpoints,
}

/// Pick the device to print on: the first of `model`, else the first found.
fn select_candidate<D>(candidates: Vec<Candidate<D>>, model: &QlModel) -> Result<Candidate<D>, LabelError> {
    let preferred = candidates
        .iter()
        .position(|c| c.product_id == model.usb_product_id)
        .unwrap_or(0);
    candidates
        .into_iter()
        .nth(preferred)
        .ok_or(LabelError::NoDeviceFound)
}

/// Sends raster jobs to the first Brother printer on the bus.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsbRasterTransport {
    model: QlModel,
    settings: PollSettings,
}

impl UsbRasterTransport {
    pub fn new(model: QlModel) -> Self {
        Self {
            model,
            settings: PollSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl PrinterTransport for UsbRasterTransport {
    fn send_raw(&self, data: &[u8]) -> Result<Delivery, LabelError> {
        debug!(state = ?SessionState::Idle, "Looking for printer");
        let handle = UsbPrinterHandle::open_first(&self.model, self.settings.interval)?;

        match RasterSession::new(handle, self.settings).run(data)? {
            SessionState::Completed => Ok(Delivery::Confirmed),
            _ => Ok(Delivery::Unconfirmed),
        }
    }
}

/// An opened printer with its interface claimed.
pub struct UsbPrinterHandle {
    handle: DeviceHandle<GlobalContext>,
    endpoints: PrinterEndpoints,
    read_timeout: Duration,
}

impl UsbPrinterHandle {
    /// Open the first Brother printer found.
    ///
    /// Devices of `model` are preferred over other Brother printers.
    pub fn open_first(model: &QlModel, read_timeout: Duration) -> Result<Self, LabelError> {
        let devices = rusb::devices().map_err(TransportError::from)?;

        let candidates: Vec<Candidate<Device<GlobalContext>>> = devices
            .iter()
            .filter_map(|device| {
                let descriptor = device.device_descriptor().ok()?;
                if descriptor.vendor_id() != BROTHER_VENDOR_ID {
                    return None;
                }
                let endpoints = printer_endpoints(&device)?;
                Some(Candidate {
                    device,
                    product_id: descriptor.product_id(),
                    endpoints,
                })
            })
            .collect();

        let Candidate {
            device,
            product_id: product,
            endpoints,
        } = select_candidate(candidates, model)?;
        info!(
            bus = device.bus_number(),
            address = device.address(),
            product = format_args!("{:04x}", product),
            "Found printer"
        );
        if product != model.usb_product_id {
            warn!(expected = model.name, "Printer is not the configured model");
        }

        let handle = device.open().map_err(TransportError::from)?;
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            debug!(error = %e, "Kernel driver auto-detach unavailable");
        }
        handle
            .claim_interface(endpoints.interface)
            .map_err(TransportError::from)?;
        debug!(state = ?SessionState::DeviceOpened, ?endpoints, "Interface claimed");

        Ok(Self {
            handle,
            endpoints,
            read_timeout,
        })
    }
}

impl StatusChannel for UsbPrinterHandle {
    fn write_payload(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let written = self
            .handle
            .write_bulk(self.endpoints.bulk_out, data, WRITE_TIMEOUT)?;
        if written != data.len() {
            return Err(TransportError::ShortWrite {
                written,
                expected: data.len(),
            });
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut buf = [0u8; FRAME_LEN];
        match self
            .handle
            .read_bulk(self.endpoints.bulk_in, &mut buf, self.read_timeout)
        {
            Ok(0) | Err(rusb::Error::Timeout) => Ok(None),
            Ok(n) => Ok(Some(buf[..n].to_vec())),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for UsbPrinterHandle {
    fn drop(&mut self) {
        if let Err(e) = self.handle.release_interface(self.endpoints.interface) {
            debug!(error = %e, "Failed to release printer interface");
        }
    }
}

/// Printer-class interface with bulk endpoints in both directions.
fn printer_endpoints<T: UsbContext>(device: &Device<T>) -> Option<PrinterEndpoints> {
    let config = device.active_config_descriptor().ok()?;

    config.interfaces().find_map(|interface| {
        interface.descriptors().find_map(|setting| {
            if setting.class_code() != PRINTER_CLASS {
                return None;
            }
            let bulk = |direction: Direction| {
                setting
                    .endpoint_descriptors()
                    .find(|ep| ep.transfer_type() == TransferType::Bulk && ep.direction() == direction)
                    .map(|ep| ep.address())
            };
            Some(PrinterEndpoints {
                interface: setting.interface_number(),
                bulk_in: bulk(Direction::In)?,
                bulk_out: bulk(Direction::Out)?,
            })
        })
    })
}
