//! Byte channels underneath the dispatchers.
//!
//! A transport only knows how to write a buffer and read up to `max_len`
//! bytes back; framing, chunking and retries live in `dispatch`. Concrete
//! backends are feature-gated (`usb`, `serial`); `MockTransport` is always
//! available for tests and dry runs.

mod mock;
#[cfg(feature = "serial")]
mod serial;
#[cfg(feature = "usb")]
mod usb;

pub use mock::MockTransport;
#[cfg(feature = "serial")]
pub use serial::SerialTransport;
#[cfg(feature = "usb")]
pub use usb::UsbTransport;

use thiserror::Error;

/// Failures reported by a byte channel.
///
/// # Examples
/// ```
/// use dlpc_core::TransportError;
///
/// let err = TransportError::Timeout { timeout_ms: 100 };
/// assert!(err.is_transient());
/// assert!(!TransportError::Closed.is_transient());
/// ```
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("device not found: VID={vid:04X} PID={pid:04X}")]
    DeviceNotFound { vid: u16, pid: u16 },
    #[error("failed to open device: {0}")]
    OpenFailed(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("transport closed")]
    Closed,
}

impl TransportError {
    /// Whether a single retry of the same transfer may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Timeout { .. }
            | TransportError::WriteFailed(_)
            | TransportError::ReadFailed(_) => true,
            TransportError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            TransportError::DeviceNotFound { .. }
            | TransportError::OpenFailed(_)
            | TransportError::Closed => false,
        }
    }
}

/// Duplex byte channel to one device.
pub trait Transport {
    /// Write the whole buffer.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Read at most `max_len` bytes.
    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        (**self).read(max_len)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        (**self).read(max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::TransportError;

    #[test]
    fn io_timeouts_are_transient() {
        let err = TransportError::from(std::io::Error::from(std::io::ErrorKind::TimedOut));
        assert!(err.is_transient());
        let err = TransportError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(!err.is_transient());
    }

    #[test]
    fn open_failures_are_fatal() {
        assert!(!TransportError::DeviceNotFound { vid: 1, pid: 2 }.is_transient());
        assert!(!TransportError::OpenFailed("busy".to_string()).is_transient());
    }
}
