//! RS485 constant-current laser driver.
//!
//! A thin facade over [`SerialDispatcher`]: each operation is one request
//! frame and one 10-byte reply. Commands that change state are confirmed by
//! the driver echoing the request data back.

use std::fmt;

use log::info;
use serde::Serialize;

use crate::config::Timing;
use crate::dispatch::SerialDispatcher;
use crate::error::{ProtocolError, check_range};
use crate::protocols::serial::{SerialFrame, SerialFrameError};
use crate::transport::Transport;

pub const FN_RESET_OUTPUT: u8 = 0x02;
pub const FN_SET_CURRENT: u8 = 0x03;
pub const FN_DEVICE_STATUS: u8 = 0x05;
pub const FN_CLEAR_FAULT: u8 = 0x06;

/// Highest output current the driver accepts, in milliamps.
pub const MAX_CURRENT_MA: u16 = 3500;

const REQUEST_FLAG: [u8; 3] = [0x01, 0x00, 0x00];

/// Alarm state reported by function 0x05. When several bits are set the
/// lowest one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriverAlarm {
    Normal,
    OverTemperature,
    OverCurrent,
    UnderCurrent,
    Unknown(u8),
}

impl DriverAlarm {
    pub fn from_status(status: u8) -> Self {
        if status == 0 {
            DriverAlarm::Normal
        } else if status & 0x01 != 0 {
            DriverAlarm::OverTemperature
        } else if status & 0x02 != 0 {
            DriverAlarm::OverCurrent
        } else if status & 0x04 != 0 {
            DriverAlarm::UnderCurrent
        } else {
            DriverAlarm::Unknown(status)
        }
    }
}

impl fmt::Display for DriverAlarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverAlarm::Normal => f.write_str("normal"),
            DriverAlarm::OverTemperature => f.write_str("over-temperature alarm"),
            DriverAlarm::OverCurrent => f.write_str("over-current alarm"),
            DriverAlarm::UnderCurrent => f.write_str("under-current alarm"),
            DriverAlarm::Unknown(raw) => write!(f, "unknown status 0x{raw:02X}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriverStatus {
    pub alarm: DriverAlarm,
    pub temperature_c: f32,
}

impl DriverStatus {
    /// Decode the three reply data bytes: status, then temperature in
    /// tenths of a degree, big-endian.
    pub fn from_data(data: [u8; 3]) -> Self {
        let tenths = u16::from_be_bytes([data[1], data[2]]);
        Self {
            alarm: DriverAlarm::from_status(data[0]),
            temperature_c: f32::from(tenths) * 0.1,
        }
    }
}

/// Current driver on one RS485 address.
///
/// # Examples
/// ```
/// use dlpc_core::{CurrentDriver, MockTransport, Timing};
/// use dlpc_core::protocols::serial::SerialFrame;
///
/// let mut mock = MockTransport::new();
/// mock.push_raw(SerialFrame::new(0x01, 0x03, [0x07, 0xD0, 0x00]).to_bytes().to_vec());
/// let mut driver = CurrentDriver::new(mock, 0x01, Timing::immediate());
/// driver.set_output_current(2000).unwrap();
/// ```
pub struct CurrentDriver<T> {
    dispatcher: SerialDispatcher<T>,
}

impl<T: Transport> CurrentDriver<T> {
    pub fn new(transport: T, address: u8, timing: Timing) -> Self {
        Self {
            dispatcher: SerialDispatcher::new(transport, address, timing),
        }
    }

    pub fn address(&self) -> u8 {
        self.dispatcher.address()
    }

    pub fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.dispatcher.transport_mut()
    }

    pub fn into_transport(self) -> T {
        self.dispatcher.into_transport()
    }

    /// Turn the output off.
    pub fn reset_output(&mut self) -> Result<(), ProtocolError> {
        self.confirmed(FN_RESET_OUTPUT, REQUEST_FLAG)?;
        info!("driver 0x{:02X}: output reset", self.address());
        Ok(())
    }

    /// Set the output current in milliamps.
    ///
    /// # Errors
    /// `InvalidParameter` without touching the line when `ma` exceeds 3500.
    pub fn set_output_current(&mut self, ma: u16) -> Result<(), ProtocolError> {
        check_range("output current (mA)", ma.into(), 0, MAX_CURRENT_MA.into())?;
        let [hi, lo] = ma.to_be_bytes();
        self.confirmed(FN_SET_CURRENT, [hi, lo, 0x00])?;
        info!("driver 0x{:02X}: output current {ma} mA", self.address());
        Ok(())
    }

    pub fn get_device_status(&mut self) -> Result<DriverStatus, ProtocolError> {
        let reply = self.exchange(FN_DEVICE_STATUS, REQUEST_FLAG)?;
        Ok(DriverStatus::from_data(reply.data))
    }

    pub fn clear_fault(&mut self) -> Result<(), ProtocolError> {
        self.confirmed(FN_CLEAR_FAULT, REQUEST_FLAG)?;
        info!("driver 0x{:02X}: faults cleared", self.address());
        Ok(())
    }

    fn exchange(&mut self, function_code: u8, data: [u8; 3]) -> Result<SerialFrame, ProtocolError> {
        let request = self.dispatcher.build(function_code, data);
        self.dispatcher.send_and_receive(&request, function_code)
    }

    fn confirmed(&mut self, function_code: u8, data: [u8; 3]) -> Result<(), ProtocolError> {
        let reply = self.exchange(function_code, data)?;
        if reply.data != data {
            return Err(SerialFrameError::EchoMismatch {
                expected: data,
                actual: reply.data,
            }
            .into());
        }
        Ok(())
    }
}
