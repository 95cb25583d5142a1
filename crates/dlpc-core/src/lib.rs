//! DLPC900 display controller protocol engine.
//!
//! This crate drives a DLPC900 digital micromirror controller over USB and
//! an auxiliary RS485 laser current driver. Commands flow down a fixed
//! stack: device facades (`Dmd`, `CurrentDriver`) build requests, the
//! protocol codecs (layout/reader/parser) frame them, the dispatchers chunk
//! and retry them, and a [`Transport`] moves the bytes. Replies travel the
//! same path upwards. Parsing is byte-oriented and side-effect free; all I/O
//! is isolated in `transport`.
//!
//! Invariants:
//! - One request/reply exchange is in flight per transport at any time.
//! - A frame never exceeds 512 bytes and is sent as zero-padded 64-byte
//!   packets, in order, with nothing interleaved.
//! - Each packet write is retried at most once, and only for transient
//!   transport errors.
//! - The cached display mode is a hint; the device is the source of truth.
//!
//! Concrete transports sit behind the `usb` (nusb) and `serial`
//! (serialport) features. [`MockTransport`] is always available.
//!
//! Version française (résumé):
//! Cette crate pilote un contrôleur DLPC900 en USB et un driver de courant
//! laser en RS485 : façades (`Dmd`, `CurrentDriver`) -> codecs de trames
//! (layout/reader/parser) -> dispatchers (découpage, une seule relance) ->
//! transport. Le mode d'affichage en cache n'est qu'un indice ; l'appareil
//! fait foi.
//!
//! # Examples
//! ```
//! use dlpc_core::{DisplayMode, Dmd, MockTransport, Timing};
//!
//! let mut mock = MockTransport::new();
//! // read-back after the mode write
//! mock.push_reply(&[DisplayMode::Pattern.code()]);
//! let mut dmd = Dmd::new(mock, Timing::immediate());
//! dmd.set_display_mode(DisplayMode::Pattern)?;
//! assert_eq!(dmd.cached_display_mode(), Some(DisplayMode::Pattern));
//! # Ok::<(), dlpc_core::ProtocolError>(())
//! ```

mod codec;
mod config;
mod device;
pub mod dispatch;
mod driver;
mod error;
pub mod protocols;
mod transport;

pub use codec::{BinaryImage, EncodeError, EncodedPatterns, PatternEncoder};
pub use config::{Config, ConfigError, SerialConfig, Timing, UsbConfig};
pub use device::commands;
pub use device::{
    DeviceFault, DisplayMode, Dmd, FirmwareVersion, HardwareInfo, HardwareProduct,
    HardwareStatus, InputSource, MainStatus, OTF_CHUNK_LEN, ParallelBitDepth, PatternColor,
    PatternLutEntry, PatternSequence, PortClockDefinition, PowerMode, SourceLock, StatusReport,
    Version,
};
pub use driver::{CurrentDriver, DriverAlarm, DriverStatus, MAX_CURRENT_MA};
pub use error::ProtocolError;
pub use protocols::serial::SerialFrameError;
pub use protocols::usb::FrameError;
#[cfg(feature = "serial")]
pub use transport::SerialTransport;
#[cfg(feature = "usb")]
pub use transport::UsbTransport;
pub use transport::{MockTransport, Transport, TransportError};
