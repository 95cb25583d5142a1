//! Connection and timing configuration.
//!
//! Everything deserializes from JSON with per-field defaults, so a config
//! file only has to name what differs from the stock controller setup.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocols::{serial, usb};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level configuration.
///
/// # Examples
/// ```
/// use dlpc_core::Config;
///
/// let config = Config::from_json_str(r#"{ "serial": { "port": "/dev/ttyUSB1" } }"#).unwrap();
/// assert_eq!(config.serial.port, "/dev/ttyUSB1");
/// assert_eq!(config.serial.baud_rate, 38400);
/// assert_eq!(config.usb.product_id, 0xC900);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub usb: UsbConfig,
    pub serial: SerialConfig,
    pub timing: Timing,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// USB identity and bulk endpoints of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    pub out_endpoint: u8,
    pub in_endpoint: u8,
    pub timeout_ms: u64,
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            vendor_id: 0x0451,
            product_id: 0xC900,
            interface: 0,
            out_endpoint: usb::layout::OUT_ENDPOINT,
            in_endpoint: usb::layout::IN_ENDPOINT,
            timeout_ms: 1000,
        }
    }
}

impl UsbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// RS485 line settings (always 8N1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub address: u8,
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 38400,
            address: serial::layout::DEFAULT_ADDRESS,
            timeout_ms: 1000,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Fixed waits around transfers, in milliseconds.
///
/// The settle delays are quiescence windows the controller needs after a
/// state change; they are not tuning knobs to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Pause before the single retry of a failed packet write.
    pub write_retry_backoff_ms: u64,
    /// Wait between a read command and its reply.
    pub reply_settle_ms: u64,
    /// Wait after a display-mode write before reading it back.
    pub display_mode_settle_ms: u64,
    /// Wait after a power-mode write before reading it back.
    pub power_settle_ms: u64,
    /// Wait between an RS485 request and its reply.
    pub serial_settle_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            write_retry_backoff_ms: 100,
            reply_settle_ms: 100,
            display_mode_settle_ms: 500,
            power_settle_ms: 100,
            serial_settle_ms: 50,
        }
    }
}

impl Timing {
    /// No waits at all; for mocks and tests.
    pub const fn immediate() -> Self {
        Self {
            write_retry_backoff_ms: 0,
            reply_settle_ms: 0,
            display_mode_settle_ms: 0,
            power_settle_ms: 0,
            serial_settle_ms: 0,
        }
    }

    pub fn write_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.write_retry_backoff_ms)
    }

    pub fn reply_settle(&self) -> Duration {
        Duration::from_millis(self.reply_settle_ms)
    }

    pub fn display_mode_settle(&self) -> Duration {
        Duration::from_millis(self.display_mode_settle_ms)
    }

    pub fn power_settle(&self) -> Duration {
        Duration::from_millis(self.power_settle_ms)
    }

    pub fn serial_settle(&self) -> Duration {
        Duration::from_millis(self.serial_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, Timing};

    #[test]
    fn empty_object_yields_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timing.display_mode_settle_ms, 500);
        assert_eq!(config.usb.in_endpoint, 0x81);
    }

    #[test]
    fn partial_timing_keeps_other_defaults() {
        let config = Config::from_json_str(r#"{ "timing": { "reply_settle_ms": 5 } }"#).unwrap();
        assert_eq!(config.timing.reply_settle_ms, 5);
        assert_eq!(config.timing.power_settle_ms, 100);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = Config::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn immediate_timing_is_all_zero() {
        let timing = Timing::immediate();
        assert!(timing.display_mode_settle().is_zero());
        assert!(timing.write_retry_backoff().is_zero());
    }
}
