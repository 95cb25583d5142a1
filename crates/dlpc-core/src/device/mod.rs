//! Device facade for the display controller.
//!
//! `Dmd` turns controller operations into single USB transactions through a
//! [`Dispatcher`]. It owns one piece of state, the last display mode read
//! from the device. That cache is only a hint: every setter re-queries and
//! overwrites it, `get_display_mode` always goes to the device, and the only
//! decision taken from the cache is the cheap video-pattern precondition.
//!
//! Operations are grouped by concern: `status` (identity, status bits, error
//! queries), `power`, `display` (mode state machine), `pattern` (sequence
//! control, LUT, on-the-fly upload) and `source` (input port, flips,
//! triggers).

pub mod commands;
mod display;
mod fault;
mod pattern;
mod power;
mod source;
mod status;

pub use display::DisplayMode;
pub use fault::DeviceFault;
pub use pattern::{OTF_CHUNK_LEN, PatternColor, PatternLutEntry, PatternSequence};
pub use power::PowerMode;
pub use source::{InputSource, ParallelBitDepth, PortClockDefinition, SourceLock};
pub use status::{
    FirmwareVersion, HardwareInfo, HardwareProduct, HardwareStatus, MainStatus, StatusReport,
    Version,
};

use log::warn;

use crate::config::Timing;
use crate::dispatch::Dispatcher;
use crate::error::ProtocolError;
use crate::transport::Transport;

/// Display controller reachable over one transport.
///
/// # Examples
/// ```
/// use dlpc_core::{Dmd, MockTransport, PowerMode, Timing};
///
/// let mut mock = MockTransport::new();
/// mock.push_reply(&[0]).push_reply(&[0]);
/// let mut dmd = Dmd::new(mock, Timing::immediate());
/// assert_eq!(dmd.get_current_powermode().unwrap(), PowerMode::Normal);
/// ```
pub struct Dmd<T> {
    dispatcher: Dispatcher<T>,
    current_mode: Option<DisplayMode>,
    sequence: u8,
}

impl<T: Transport> Dmd<T> {
    /// Wrap a transport without talking to the device.
    pub fn new(transport: T, timing: Timing) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport, timing),
            current_mode: None,
            sequence: 0,
        }
    }

    /// Wrap a transport and confirm the controller answers: reads the
    /// hardware identity and primes the display-mode cache.
    pub fn connect(transport: T, timing: Timing) -> Result<(Self, HardwareInfo), ProtocolError> {
        let mut dmd = Self::new(transport, timing);
        let hardware = dmd.get_hardware()?;
        dmd.get_display_mode()?;
        Ok((dmd, hardware))
    }

    /// Last display mode read from the device, if any. May be stale.
    pub fn cached_display_mode(&self) -> Option<DisplayMode> {
        self.current_mode
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

    pub(crate) fn timing(&self) -> Timing {
        *self.dispatcher.timing()
    }

    fn next_sequence(&mut self) -> u8 {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }

    /// Read command with an empty payload; returns the reply data.
    pub(crate) fn query(&mut self, command: u16) -> Result<Vec<u8>, ProtocolError> {
        let sequence = self.next_sequence();
        let reply = self.dispatcher.request(sequence, command, &[])?;
        if reply.sequence != sequence {
            warn!(
                "reply to 0x{command:04X} carries sequence {}, sent {sequence}",
                reply.sequence
            );
        }
        Ok(reply.data)
    }

    /// First data byte of a read command's reply.
    pub(crate) fn query_byte(&mut self, command: u16) -> Result<u8, ProtocolError> {
        let data = self.query(command)?;
        require_data(command, &data, 1)?;
        Ok(data[0])
    }

    /// Write command; no reply.
    pub(crate) fn write(&mut self, command: u16, payload: &[u8]) -> Result<(), ProtocolError> {
        let sequence = self.next_sequence();
        self.dispatcher.send(sequence, command, payload)
    }
}

pub(crate) fn require_data(command: u16, data: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if data.len() < needed {
        return Err(ProtocolError::MalformedReply {
            command,
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Dmd;
    use crate::config::Timing;
    use crate::error::ProtocolError;
    use crate::protocols::usb::Direction;
    use crate::transport::MockTransport;

    #[test]
    fn sequence_bytes_increment_per_command() {
        let mut dmd = Dmd::new(MockTransport::new(), Timing::immediate());
        dmd.write(0x1A24, &[0]).unwrap();
        dmd.write(0x1A24, &[2]).unwrap();
        let commands = dmd.transport().commands();
        assert_eq!(commands[0].sequence(), 0);
        assert_eq!(commands[1].sequence(), 1);
        assert_eq!(commands[1].direction(), Direction::Write);
    }

    #[test]
    fn query_byte_rejects_empty_data() {
        let mut mock = MockTransport::new();
        mock.push_reply(&[]);
        let mut dmd = Dmd::new(mock, Timing::immediate());
        let err = dmd.query_byte(0x1A1B).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedReply {
                command: 0x1A1B,
                needed: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn connect_reads_identity_and_mode() {
        let mut mock = MockTransport::new();
        let mut identity = vec![0x02];
        identity.extend_from_slice(b"v5.2.0");
        mock.push_reply(&identity).push_reply(&[1]);
        let (dmd, hardware) = Dmd::connect(mock, Timing::immediate()).unwrap();
        assert_eq!(hardware.firmware_tag, "v5.2.0");
        assert_eq!(
            dmd.cached_display_mode(),
            Some(crate::device::DisplayMode::Pattern)
        );
    }
}
