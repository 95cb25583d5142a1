use thiserror::Error;

/// Reasons an RS485 reply is rejected.
///
/// # Examples
/// ```
/// use dlpc_core::SerialFrameError;
///
/// let err = SerialFrameError::ChecksumMismatch { expected: 1, actual: 2 };
/// assert!(err.to_string().contains("checksum mismatch"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialFrameError {
    #[error("wrong frame length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("invalid frame header: {0:02X?}")]
    BadHeader([u8; 2]),
    #[error("invalid frame tail: {0:02X?}")]
    BadTail([u8; 2]),
    #[error("address mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    AddressMismatch { expected: u8, actual: u8 },
    #[error("function code mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    FunctionMismatch { expected: u8, actual: u8 },
    #[error("checksum mismatch: computed 0x{expected:02X}, frame carries 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
    #[error("reply data {actual:02X?} does not echo request {expected:02X?}")]
    EchoMismatch { expected: [u8; 3], actual: [u8; 3] },
}
