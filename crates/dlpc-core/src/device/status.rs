use std::fmt;

use serde::Serialize;

use super::commands;
use super::{DeviceFault, DisplayMode, Dmd, PowerMode, require_data};
use crate::error::ProtocolError;
use crate::transport::Transport;

/// Controller/DMD combination reported by the hardware query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareProduct {
    Unknown,
    Dlp6500,
    Dlp9000,
    Dlp670s,
    Dlp500yx,
    Dlp5500,
    /// Code not listed in the programmer's guide.
    Undocumented(u8),
}

impl HardwareProduct {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => HardwareProduct::Unknown,
            0x01 => HardwareProduct::Dlp6500,
            0x02 => HardwareProduct::Dlp9000,
            0x03 => HardwareProduct::Dlp670s,
            0x04 => HardwareProduct::Dlp500yx,
            0x05 => HardwareProduct::Dlp5500,
            other => HardwareProduct::Undocumented(other),
        }
    }
}

impl fmt::Display for HardwareProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareProduct::Unknown => write!(f, "unknown"),
            HardwareProduct::Dlp6500 => write!(f, "DLP6500"),
            HardwareProduct::Dlp9000 => write!(f, "DLP9000"),
            HardwareProduct::Dlp670s => write!(f, "DLP670S"),
            HardwareProduct::Dlp500yx => write!(f, "DLP500YX"),
            HardwareProduct::Dlp5500 => write!(f, "DLP5500"),
            HardwareProduct::Undocumented(code) => write!(f, "undocumented hardware (0x{code:02X})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardwareInfo {
    pub product: HardwareProduct,
    /// ASCII firmware tag, trailing NULs removed.
    pub firmware_tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u16,
}

impl Version {
    /// `patch` (LE u16) at offset 0, `minor` at 2, `major` at 3.
    fn from_group(group: &[u8]) -> Self {
        Self {
            major: group[3],
            minor: group[2],
            patch: u16::from_le_bytes([group[0], group[1]]),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FirmwareVersion {
    pub application: Version,
    pub api: Version,
    pub software_config: Version,
    pub sequencer_config: Version,
}

impl FirmwareVersion {
    pub const LEN: usize = 16;

    /// Decode four 4-byte version groups; `None` if fewer than 16 bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::LEN {
            return None;
        }
        Some(Self {
            application: Version::from_group(&data[0..4]),
            api: Version::from_group(&data[4..8]),
            software_config: Version::from_group(&data[8..12]),
            sequencer_config: Version::from_group(&data[12..16]),
        })
    }
}

/// Hardware status byte (command 0x1A0A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HardwareStatus {
    pub raw: u8,
}

impl HardwareStatus {
    pub fn init_successful(&self) -> bool {
        self.raw & 0x01 != 0
    }

    pub fn incompatible(&self) -> bool {
        self.raw & 0x02 != 0
    }

    pub fn dmd_reset_controller_error(&self) -> bool {
        self.raw & 0x04 != 0
    }

    pub fn forced_swap_error(&self) -> bool {
        self.raw & 0x08 != 0
    }

    pub fn secondary_controller_present(&self) -> bool {
        self.raw & 0x10 != 0
    }

    pub fn sequencer_abort(&self) -> bool {
        self.raw & 0x40 != 0
    }

    pub fn sequencer_error(&self) -> bool {
        self.raw & 0x80 != 0
    }

    pub fn error_count(&self) -> usize {
        [
            !self.init_successful(),
            self.incompatible(),
            self.dmd_reset_controller_error(),
            self.forced_swap_error(),
            self.sequencer_abort(),
            self.sequencer_error(),
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count()
    }

    /// One line per reported condition.
    pub fn describe(&self) -> Vec<&'static str> {
        let mut lines = Vec::new();
        lines.push(if self.init_successful() {
            "Internal initialization successful"
        } else {
            "Internal initialization error"
        });
        lines.push(if self.incompatible() {
            "Incompatible controller or DMD, or wrong firmware loaded"
        } else {
            "System is compatible"
        });
        if self.dmd_reset_controller_error() {
            lines.push("DMD reset controller error: overlapping bias or reset operations");
        }
        if self.forced_swap_error() {
            lines.push("Forced swap error occurred");
        }
        if self.secondary_controller_present() {
            lines.push("Secondary controller present and ready");
        }
        if self.sequencer_abort() {
            lines.push("Sequencer detected an error condition that caused an abort");
        }
        if self.sequencer_error() {
            lines.push("Sequencer detected an error");
        }
        lines
    }
}

/// Main status byte (command 0x1A0C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MainStatus {
    pub raw: u8,
}

impl MainStatus {
    pub fn mirrors_parked(&self) -> bool {
        self.raw & 0x01 != 0
    }

    pub fn sequencer_running(&self) -> bool {
        self.raw & 0x02 != 0
    }

    pub fn video_frozen(&self) -> bool {
        self.raw & 0x04 != 0
    }

    pub fn source_locked(&self) -> bool {
        self.raw & 0x08 != 0
    }

    pub fn port1_syncs_valid(&self) -> bool {
        self.raw & 0x10 != 0
    }

    pub fn port2_syncs_valid(&self) -> bool {
        self.raw & 0x20 != 0
    }
}

/// Aggregate snapshot for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub hardware: HardwareInfo,
    pub firmware: FirmwareVersion,
    pub hardware_status: HardwareStatus,
    pub hardware_errors: Vec<&'static str>,
    pub main_status: MainStatus,
    pub power_mode: PowerMode,
    pub display_mode: DisplayMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<DeviceFault>,
}

const SYSTEM_MEMORY_OK: u8 = 0x01;
const COMMUNICATION_ERROR_BITS: u8 = 0x05;

impl<T: Transport> Dmd<T> {
    pub fn get_hardware(&mut self) -> Result<HardwareInfo, ProtocolError> {
        let data = self.query(commands::HARDWARE_INFO)?;
        require_data(commands::HARDWARE_INFO, &data, 1)?;
        Ok(HardwareInfo {
            product: HardwareProduct::from_code(data[0]),
            firmware_tag: ascii_trimmed(&data[1..]),
        })
    }

    pub fn get_firmware_version(&mut self) -> Result<FirmwareVersion, ProtocolError> {
        let data = self.query(commands::FIRMWARE_VERSION)?;
        FirmwareVersion::from_bytes(&data).ok_or(ProtocolError::MalformedReply {
            command: commands::FIRMWARE_VERSION,
            needed: FirmwareVersion::LEN,
            actual: data.len(),
        })
    }

    pub fn get_hardware_status(&mut self) -> Result<HardwareStatus, ProtocolError> {
        let raw = self.query_byte(commands::HARDWARE_STATUS)?;
        Ok(HardwareStatus { raw })
    }

    pub fn get_main_status(&mut self) -> Result<MainStatus, ProtocolError> {
        let raw = self.query_byte(commands::MAIN_STATUS)?;
        Ok(MainStatus { raw })
    }

    /// Fails when the controller reports it cannot talk to the DMD.
    pub fn check_communication_status(&mut self) -> Result<(), ProtocolError> {
        let status = self.query_byte(commands::COMMUNICATION_STATUS)?;
        if status & COMMUNICATION_ERROR_BITS != 0 {
            return Err(ProtocolError::StatusCheckFailed {
                check: "controller to DMD communication",
                status,
            });
        }
        Ok(())
    }

    /// Fails when the internal memory test did not pass.
    pub fn check_system_status(&mut self) -> Result<(), ProtocolError> {
        let status = self.query_byte(commands::SYSTEM_STATUS)?;
        if status & SYSTEM_MEMORY_OK == 0 {
            return Err(ProtocolError::StatusCheckFailed {
                check: "internal memory test",
                status,
            });
        }
        Ok(())
    }

    /// Last error code recorded by the controller, `None` when clear.
    ///
    /// Some firmware answers with an empty reply when nothing is pending;
    /// that is treated as no error.
    pub fn check_for_error(&mut self) -> Result<Option<DeviceFault>, ProtocolError> {
        let data = self.query(commands::READ_ERROR_CODE)?;
        Ok(data.first().and_then(|code| DeviceFault::from_code(*code)))
    }

    /// Like [`check_for_error`](Self::check_for_error), but a recorded
    /// fault becomes `ProtocolError::Fault`.
    pub fn ensure_no_fault(&mut self) -> Result<(), ProtocolError> {
        match self.check_for_error()? {
            Some(fault) => Err(ProtocolError::Fault(fault)),
            None => Ok(()),
        }
    }

    /// Human-readable description of the last error.
    pub fn get_error_description(&mut self) -> Result<String, ProtocolError> {
        let data = self.query(commands::READ_ERROR_DESCRIPTION)?;
        Ok(ascii_trimmed(&data))
    }

    pub fn status_report(&mut self) -> Result<StatusReport, ProtocolError> {
        let hardware = self.get_hardware()?;
        let firmware = self.get_firmware_version()?;
        let hardware_status = self.get_hardware_status()?;
        let main_status = self.get_main_status()?;
        let power_mode = self.get_current_powermode()?;
        let display_mode = self.get_display_mode()?;
        let last_error = self.check_for_error()?;
        Ok(StatusReport {
            hardware,
            firmware,
            hardware_errors: hardware_status.describe(),
            hardware_status,
            main_status,
            power_mode,
            display_mode,
            last_error,
        })
    }
}

fn ascii_trimmed(bytes: &[u8]) -> String {
    let text: String = bytes
        .iter()
        .filter(|b| **b != 0)
        .map(|b| char::from(*b))
        .collect();
    text.trim().to_string()
}
