use std::fmt;

use serde::Serialize;

/// Error codes returned by the last-error query (command 0x0100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceFault {
    BatchChecksum,
    DeviceFailure,
    InvalidCommand,
    IncompatibleHardware,
    NotAllowedInMode,
    InvalidParameter,
    MissingItem,
    OutOfResource,
    InvalidCompression,
    BitNumberOutOfRange,
    PatternImageMissing,
    DarkTimeOutOfRange,
    SignalDelayOutOfRange,
    ExposureOutOfRange,
    PatternNumberOutOfRange,
    InvalidPatternDefinition,
    ImageAddressOutOfRange,
    Internal,
    Undocumented(u8),
}

impl DeviceFault {
    /// `None` for code 0 (no error).
    pub fn from_code(code: u8) -> Option<Self> {
        let fault = match code {
            0 => return None,
            1 => DeviceFault::BatchChecksum,
            2 => DeviceFault::DeviceFailure,
            3 => DeviceFault::InvalidCommand,
            4 => DeviceFault::IncompatibleHardware,
            5 => DeviceFault::NotAllowedInMode,
            6 => DeviceFault::InvalidParameter,
            7 => DeviceFault::MissingItem,
            8 => DeviceFault::OutOfResource,
            9 => DeviceFault::InvalidCompression,
            10 => DeviceFault::BitNumberOutOfRange,
            11 => DeviceFault::PatternImageMissing,
            12 => DeviceFault::DarkTimeOutOfRange,
            13 => DeviceFault::SignalDelayOutOfRange,
            14 => DeviceFault::ExposureOutOfRange,
            15 => DeviceFault::PatternNumberOutOfRange,
            16 => DeviceFault::InvalidPatternDefinition,
            17 => DeviceFault::ImageAddressOutOfRange,
            255 => DeviceFault::Internal,
            other => DeviceFault::Undocumented(other),
        };
        Some(fault)
    }

    pub fn code(&self) -> u8 {
        match self {
            DeviceFault::BatchChecksum => 1,
            DeviceFault::DeviceFailure => 2,
            DeviceFault::InvalidCommand => 3,
            DeviceFault::IncompatibleHardware => 4,
            DeviceFault::NotAllowedInMode => 5,
            DeviceFault::InvalidParameter => 6,
            DeviceFault::MissingItem => 7,
            DeviceFault::OutOfResource => 8,
            DeviceFault::InvalidCompression => 9,
            DeviceFault::BitNumberOutOfRange => 10,
            DeviceFault::PatternImageMissing => 11,
            DeviceFault::DarkTimeOutOfRange => 12,
            DeviceFault::SignalDelayOutOfRange => 13,
            DeviceFault::ExposureOutOfRange => 14,
            DeviceFault::PatternNumberOutOfRange => 15,
            DeviceFault::InvalidPatternDefinition => 16,
            DeviceFault::ImageAddressOutOfRange => 17,
            DeviceFault::Internal => 255,
            DeviceFault::Undocumented(code) => *code,
        }
    }
}

impl fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DeviceFault::BatchChecksum => "batch file checksum error",
            DeviceFault::DeviceFailure => "device failure",
            DeviceFault::InvalidCommand => "invalid command number",
            DeviceFault::IncompatibleHardware => "incompatible controller and DMD combination",
            DeviceFault::NotAllowedInMode => "command not allowed in current mode",
            DeviceFault::InvalidParameter => "invalid command parameter",
            DeviceFault::MissingItem => "item referred by the parameter is not present",
            DeviceFault::OutOfResource => "out of resource (RAM or flash)",
            DeviceFault::InvalidCompression => "invalid BMP compression type",
            DeviceFault::BitNumberOutOfRange => "pattern bit number out of range",
            DeviceFault::PatternImageMissing => "pattern BMP not present in flash",
            DeviceFault::DarkTimeOutOfRange => "pattern dark time out of range",
            DeviceFault::SignalDelayOutOfRange => "signal delay parameter out of range",
            DeviceFault::ExposureOutOfRange => "pattern exposure time out of range",
            DeviceFault::PatternNumberOutOfRange => "pattern number out of range",
            DeviceFault::InvalidPatternDefinition => "invalid pattern definition",
            DeviceFault::ImageAddressOutOfRange => "pattern image memory address out of range",
            DeviceFault::Internal => "internal error",
            DeviceFault::Undocumented(code) => return write!(f, "undocumented error [{code}]"),
        };
        f.write_str(message)
    }
}
