use thiserror::Error;

/// Errors returned while building or decoding USB frames.
///
/// # Examples
/// ```
/// use dlpc_core::FrameError;
///
/// let err = FrameError::ShortReply { needed: 4, actual: 2 };
/// assert!(err.to_string().contains("reply too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("payload too large: {len} bytes, limit is {max}")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("reply too short: need {needed} bytes, got {actual}")]
    ShortReply { needed: usize, actual: usize },
    #[error("truncated payload: header declares {declared} bytes, got {actual}")]
    TruncatedPayload { declared: usize, actual: usize },
    #[error("command frame length {length} cannot hold a command code")]
    MissingCommand { length: u16 },
}
