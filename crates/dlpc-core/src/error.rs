use thiserror::Error;

use crate::device::{DeviceFault, DisplayMode, PowerMode};
use crate::protocols::serial::SerialFrameError;
use crate::protocols::usb::FrameError;
use crate::transport::TransportError;

/// Errors returned by the dispatchers and device facades.
///
/// Nothing is swallowed: apart from the single write retry and the single
/// display-mode read-back retry, every failure reaches the caller.
///
/// # Examples
/// ```
/// use dlpc_core::{DisplayMode, ProtocolError};
///
/// let err = ProtocolError::InvalidTransition {
///     from: Some(DisplayMode::Pattern),
///     to: DisplayMode::VideoPattern,
/// };
/// assert!(err.to_string().contains("video-pattern"));
/// ```
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("malformed reply: {0}")]
    Frame(#[from] FrameError),
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] SerialFrameError),
    #[error("controller flagged an error for command 0x{command:04X} (flags 0x{flags:02X})")]
    Device { command: u16, flags: u8 },
    #[error("device fault: {0}")]
    Fault(DeviceFault),
    #[error("{check} failed (status 0x{status:02X})")]
    StatusCheckFailed { check: &'static str, status: u8 },
    #[error("cannot switch display mode from {} to {to}", describe_mode(.from))]
    InvalidTransition {
        from: Option<DisplayMode>,
        to: DisplayMode,
    },
    #[error("display mode activation failed: requested {requested}, device reports {actual}")]
    ModeActivationFailed {
        requested: DisplayMode,
        actual: DisplayMode,
    },
    #[error("power transition failed: requested {requested}, device reports {actual}")]
    TransitionFailed {
        requested: PowerMode,
        actual: PowerMode,
    },
    #[error("{name} = {value} is outside {min}..={max}")]
    InvalidParameter {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("unexpected value 0x{value:02X} in reply to command 0x{command:04X}")]
    UnexpectedValue { command: u16, value: u8 },
    #[error("reply to command 0x{command:04X} too short: need {needed} bytes, got {actual}")]
    MalformedReply {
        command: u16,
        needed: usize,
        actual: usize,
    },
    #[error("pattern encoding failed: {0}")]
    Encode(String),
}

fn describe_mode(mode: &Option<DisplayMode>) -> String {
    match mode {
        Some(mode) => mode.to_string(),
        None => "unknown".to_string(),
    }
}

/// Range check shared by the parameter-taking operations.
pub(crate) fn check_range(
    name: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), ProtocolError> {
    if value < min || value > max {
        return Err(ProtocolError::InvalidParameter {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
