//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - USB printers (libusb bulk transfers)
//! - In-memory printer (records writes, for tests and dry runs)

use crate::error::{PrintError, PrintResult};
use async_trait::async_trait;
use rusb::{DeviceHandle, Direction, GlobalContext, TransferType, UsbContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Trait for printer adapters
#[async_trait]
pub trait Printer: Send + Sync {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Claimed USB interface, released on drop
struct UsbDevice {
    handle: DeviceHandle<GlobalContext>,
    interface: u8,
    endpoint: u8,
}

impl Drop for UsbDevice {
    fn drop(&mut self) {
        if let Err(e) = self.handle.release_interface(self.interface) {
            debug!(error = %e, interface = self.interface, "Release interface failed");
        }
    }
}

/// USB printer
///
/// Holds the device open and the interface claimed for as long as the value
/// lives. Writes are blocking libusb bulk transfers and run on the blocking
/// thread pool.
#[derive(Clone)]
pub struct UsbPrinter {
    device: Arc<UsbDevice>,
    vendor_id: u16,
    product_id: u16,
    timeout: Duration,
}

impl std::fmt::Debug for UsbPrinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbPrinter")
            .field("vendor_id", &format_args!("{:#06x}", self.vendor_id))
            .field("product_id", &format_args!("{:#06x}", self.product_id))
            .field("interface", &self.device.interface)
            .field("endpoint", &format_args!("{:#04x}", self.device.endpoint))
            .finish()
    }
}

impl UsbPrinter {
    /// Open the device and claim `interface`
    ///
    /// Fails when no device with these ids is attached, when the process
    /// lacks permission to open it, or when the interface has no bulk OUT
    /// endpoint.
    #[instrument(skip(timeout))]
    pub fn open(
        vendor_id: u16,
        product_id: u16,
        interface: u8,
        timeout: Duration,
    ) -> PrintResult<Self> {
        let handle = rusb::open_device_with_vid_pid(vendor_id, product_id).ok_or(
            PrintError::DeviceNotFound {
                vendor_id,
                product_id,
            },
        )?;

        let endpoint = find_bulk_out(&handle, interface)?;

        // Linux binds usblp to most receipt printers
        match handle.set_auto_detach_kernel_driver(true) {
            Ok(()) => {}
            Err(rusb::Error::NotSupported) => debug!("Kernel driver auto-detach not supported"),
            Err(e) => warn!(error = %e, "Kernel driver auto-detach failed"),
        }

        handle.claim_interface(interface)?;

        info!(interface, endpoint = %format!("{:#04x}", endpoint), "USB printer opened");

        Ok(Self {
            device: Arc::new(UsbDevice {
                handle,
                interface,
                endpoint,
            }),
            vendor_id,
            product_id,
            timeout,
        })
    }

    /// Write the whole buffer, following up on partial transfers
    fn write_all(device: &UsbDevice, data: &[u8], timeout: Duration) -> PrintResult<()> {
        let mut offset = 0;
        while offset < data.len() {
            let written = device
                .handle
                .write_bulk(device.endpoint, &data[offset..], timeout)
                .map_err(|e| match e {
                    rusb::Error::Timeout => PrintError::Timeout(format!(
                        "bulk write stalled after {} of {} bytes",
                        offset,
                        data.len()
                    )),
                    rusb::Error::NoDevice => PrintError::Offline("USB device disconnected".into()),
                    other => PrintError::Usb(other),
                })?;

            if written == 0 {
                return Err(PrintError::Io(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "printer accepted no data",
                )));
            }
            offset += written;
        }
        Ok(())
    }
}

#[async_trait]
impl Printer for UsbPrinter {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let device = self.device.clone();
        let data = data.to_vec();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || Self::write_all(&device, &data, timeout))
            .await
            .map_err(|e| PrintError::Connection(format!("Write task failed: {}", e)))?
    }

    async fn is_online(&self) -> bool {
        let (vendor_id, product_id) = (self.vendor_id, self.product_id);

        let present = tokio::task::spawn_blocking(move || {
            GlobalContext::default()
                .devices()
                .map(|list| {
                    list.iter().any(|d| {
                        d.device_descriptor()
                            .map(|desc| {
                                desc.vendor_id() == vendor_id && desc.product_id() == product_id
                            })
                            .unwrap_or(false)
                    })
                })
                .unwrap_or(false)
        })
        .await
        .unwrap_or(false);

        if !present {
            warn!("Printer offline");
        }
        present
    }
}

/// Locate the bulk OUT endpoint of `interface` in the active configuration
fn find_bulk_out(handle: &DeviceHandle<GlobalContext>, interface: u8) -> PrintResult<u8> {
    let config = handle.device().active_config_descriptor()?;

    config
        .interfaces()
        .filter(|i| i.number() == interface)
        .flat_map(|i| i.descriptors())
        .flat_map(|d| d.endpoint_descriptors().collect::<Vec<_>>())
        .find(|ep| ep.direction() == Direction::Out && ep.transfer_type() == TransferType::Bulk)
        .map(|ep| ep.address())
        .ok_or(PrintError::NoEndpoint(interface))
}
