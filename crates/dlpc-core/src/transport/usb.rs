use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use nusb::Interface;
use nusb::transfer::{Completion, RequestBuffer};
use tokio::runtime::{Builder, Runtime};
use tokio::time::timeout;

use super::{Transport, TransportError};
use crate::config::UsbConfig;

/// Bulk-endpoint transport to the controller's HID-class interface.
///
/// nusb transfers are futures; each call drives one to completion on a
/// private current-thread runtime so the dispatcher stays synchronous.
pub struct UsbTransport {
    interface: Interface,
    runtime: Runtime,
    out_endpoint: u8,
    in_endpoint: u8,
    timeout: Duration,
}

impl UsbTransport {
    /// Find the first device matching the configured VID/PID and claim its
    /// interface, detaching any kernel driver.
    pub fn open(config: &UsbConfig) -> Result<Self, TransportError> {
        let device_info = nusb::list_devices()
            .map_err(|e| TransportError::OpenFailed(format!("USB enumeration: {e}")))?
            .find(|d| d.vendor_id() == config.vendor_id && d.product_id() == config.product_id)
            .ok_or(TransportError::DeviceNotFound {
                vid: config.vendor_id,
                pid: config.product_id,
            })?;

        info!(
            "found controller on bus {} addr {}",
            device_info.bus_number(),
            device_info.device_address()
        );

        let device = device_info
            .open()
            .map_err(|e| TransportError::OpenFailed(format!("USB open: {e}")))?;
        if let Err(err) = device.set_configuration(1) {
            // Already configured by the OS on most hosts.
            debug!("set_configuration(1) skipped: {err}");
        }
        let interface = device
            .detach_and_claim_interface(config.interface)
            .map_err(|e| {
                TransportError::OpenFailed(format!("claim interface {}: {e}", config.interface))
            })?;

        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(TransportError::Io)?;

        Ok(Self {
            interface,
            runtime,
            out_endpoint: config.out_endpoint,
            in_endpoint: config.in_endpoint,
            timeout: config.timeout(),
        })
    }

    fn complete<B, F>(&self, transfer: F) -> Result<Completion<B>, TransportError>
    where
        F: Future<Output = Completion<B>>,
    {
        let limit = self.timeout;
        self.runtime
            .block_on(async move { timeout(limit, transfer).await })
            .map_err(|_| TransportError::Timeout {
                timeout_ms: limit.as_millis() as u64,
            })
    }
}

impl Transport for UsbTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let transfer = self.interface.bulk_out(self.out_endpoint, bytes.to_vec());
        let completion = self.complete(transfer)?;
        let sent = completion
            .into_result()
            .map_err(|e| TransportError::WriteFailed(e.to_string()))?;
        if sent.actual_length() != bytes.len() {
            return Err(TransportError::WriteFailed(format!(
                "short write: {} of {} bytes",
                sent.actual_length(),
                bytes.len()
            )));
        }
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        let transfer = self
            .interface
            .bulk_in(self.in_endpoint, RequestBuffer::new(max_len));
        let completion = self.complete(transfer)?;
        completion
            .into_result()
            .map_err(|e| TransportError::ReadFailed(e.to_string()))
    }
}
