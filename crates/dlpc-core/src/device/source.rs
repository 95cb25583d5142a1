use log::debug;

use super::{Dmd, commands};
use crate::error::{ProtocolError, check_range};
use crate::transport::Transport;

const MAX_TEST_PATTERN: u8 = 10;

/// Image source selected by command 0x1A00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Parallel,
    InternalTest,
    Flash,
    SolidCurtain,
}

impl InputSource {
    pub fn code(self) -> u8 {
        match self {
            InputSource::Parallel => 0,
            InputSource::InternalTest => 1,
            InputSource::Flash => 2,
            InputSource::SolidCurtain => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(InputSource::Parallel),
            1 => Some(InputSource::InternalTest),
            2 => Some(InputSource::Flash),
            3 => Some(InputSource::SolidCurtain),
            _ => None,
        }
    }
}

/// Bus width of the parallel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelBitDepth {
    Bits30,
    Bits24,
    Bits20,
    Bits16,
}

impl ParallelBitDepth {
    pub fn code(self) -> u8 {
        match self {
            ParallelBitDepth::Bits30 => 0,
            ParallelBitDepth::Bits24 => 1,
            ParallelBitDepth::Bits20 => 2,
            ParallelBitDepth::Bits16 => 3,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => ParallelBitDepth::Bits30,
            1 => ParallelBitDepth::Bits24,
            2 => ParallelBitDepth::Bits20,
            _ => ParallelBitDepth::Bits16,
        }
    }
}

/// Port, pixel clock, data enable and sync selection (command 0x1A03).
///
/// ```text
/// bits 1:0  data port (0 port 1, 1 port 2, 2 dual 1-2, 3 dual 2-1)
/// bits 3:2  pixel clock
/// bit  4    data enable
/// bit  5    vsync/hsync source
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortClockDefinition {
    pub data_port: u8,
    pub pixel_clock: u8,
    pub data_enable: u8,
    pub vhsync: u8,
}

impl PortClockDefinition {
    pub fn to_byte(self) -> u8 {
        (self.data_port & 0x03)
            | ((self.pixel_clock & 0x03) << 2)
            | ((self.data_enable & 0x01) << 4)
            | ((self.vhsync & 0x01) << 5)
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            data_port: byte & 0x03,
            pixel_clock: (byte >> 2) & 0x03,
            data_enable: (byte >> 4) & 0x01,
            vhsync: (byte >> 5) & 0x01,
        }
    }
}

/// External source lock as reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLock {
    NotLocked,
    Hdmi,
    DisplayPort,
    Other(u8),
}

const PORT_RELEASE: u8 = 0;
const PORT_HDMI: u8 = 1;
const PORT_DISPLAYPORT: u8 = 2;

impl<T: Transport> Dmd<T> {
    pub fn set_input_source(
        &mut self,
        source: InputSource,
        bit_depth: ParallelBitDepth,
    ) -> Result<(), ProtocolError> {
        let payload = (source.code() & 0x07) | ((bit_depth.code() & 0x03) << 3);
        self.write(commands::INPUT_SOURCE, &[payload])
    }

    pub fn get_input_source(&mut self) -> Result<(InputSource, ParallelBitDepth), ProtocolError> {
        let byte = self.query_byte(commands::INPUT_SOURCE)?;
        let source = InputSource::from_code(byte & 0x07).ok_or(ProtocolError::UnexpectedValue {
            command: commands::INPUT_SOURCE,
            value: byte,
        })?;
        Ok((source, ParallelBitDepth::from_code(byte >> 3)))
    }

    pub fn set_port_clock_definition(
        &mut self,
        definition: PortClockDefinition,
    ) -> Result<(), ProtocolError> {
        self.write(commands::PORT_CLOCK, &[definition.to_byte()])
    }

    pub fn get_port_clock_definition(&mut self) -> Result<PortClockDefinition, ProtocolError> {
        let byte = self.query_byte(commands::PORT_CLOCK)?;
        Ok(PortClockDefinition::from_byte(byte))
    }

    /// Power up the DisplayPort receiver and select the 30-bit parallel input.
    pub fn lock_displayport(&mut self) -> Result<(), ProtocolError> {
        self.select_port(PORT_DISPLAYPORT)
    }

    pub fn lock_hdmi(&mut self) -> Result<(), ProtocolError> {
        self.select_port(PORT_HDMI)
    }

    pub fn lock_release(&mut self) -> Result<(), ProtocolError> {
        self.select_port(PORT_RELEASE)
    }

    fn select_port(&mut self, port: u8) -> Result<(), ProtocolError> {
        debug!("selecting video port {port}");
        self.write(commands::PORT_POWER, &[port])?;
        self.set_input_source(InputSource::Parallel, ParallelBitDepth::Bits30)
    }

    /// Which external port, if any, currently has a lock.
    pub fn get_source_lock(&mut self) -> Result<SourceLock, ProtocolError> {
        if !self.get_main_status()?.source_locked() {
            return Ok(SourceLock::NotLocked);
        }
        let port = self.query_byte(commands::PORT_POWER)?;
        Ok(match port {
            PORT_RELEASE => SourceLock::NotLocked,
            PORT_HDMI => SourceLock::Hdmi,
            PORT_DISPLAYPORT => SourceLock::DisplayPort,
            other => SourceLock::Other(other),
        })
    }

    pub fn set_input_source_config(
        &mut self,
        width: u16,
        height: u16,
        frame_rate: u16,
    ) -> Result<(), ProtocolError> {
        let mut payload = [0u8; 6];
        payload[0..2].copy_from_slice(&width.to_le_bytes());
        payload[2..4].copy_from_slice(&height.to_le_bytes());
        payload[4..6].copy_from_slice(&frame_rate.to_le_bytes());
        self.write(commands::INPUT_SOURCE_CONFIG, &payload)
    }

    pub fn set_flip_longaxis(&mut self, flip: bool) -> Result<(), ProtocolError> {
        self.write(commands::FLIP_LONG_AXIS, &[u8::from(flip)])
    }

    pub fn get_flip_longaxis(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.query_byte(commands::FLIP_LONG_AXIS)? > 0)
    }

    pub fn set_flip_shortaxis(&mut self, flip: bool) -> Result<(), ProtocolError> {
        self.write(commands::FLIP_SHORT_AXIS, &[u8::from(flip)])
    }

    pub fn get_flip_shortaxis(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.query_byte(commands::FLIP_SHORT_AXIS)? > 0)
    }

    /// Select one of the built-in test patterns (0 solid field, 1 horizontal
    /// ramp, 2 vertical ramp, 3 checkerboard, ...).
    pub fn set_test_pattern(&mut self, pattern: u8) -> Result<(), ProtocolError> {
        check_range("test pattern", pattern.into(), 0, MAX_TEST_PATTERN.into())?;
        self.write(commands::TEST_PATTERN, &[pattern])
    }

    pub fn set_min_led_pulse_width_us(&mut self, width_us: u32) -> Result<(), ProtocolError> {
        self.write(commands::MIN_LED_PULSE_WIDTH, &width_us.to_le_bytes())
    }

    /// Configure trigger out 1. Delays are in nanoseconds; `normal_polarity`
    /// false inverts the output.
    pub fn set_trigger_out1(
        &mut self,
        normal_polarity: bool,
        rising_delay_ns: u16,
        falling_delay_ns: u16,
    ) -> Result<(), ProtocolError> {
        let mut payload = [0u8; 5];
        payload[0] = u8::from(normal_polarity);
        payload[1..3].copy_from_slice(&rising_delay_ns.to_le_bytes());
        payload[3..5].copy_from_slice(&falling_delay_ns.to_le_bytes());
        self.write(commands::TRIGGER_OUT1, &payload)
    }

    pub fn set_trigger_in1(&mut self, delay_ns: u32) -> Result<(), ProtocolError> {
        self.write(commands::TRIGGER_IN1, &delay_ns.to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::{InputSource, ParallelBitDepth, PortClockDefinition, SourceLock};
    use crate::config::Timing;
    use crate::device::Dmd;
    use crate::error::ProtocolError;
    use crate::transport::MockTransport;

    #[test]
    fn input_source_packs_depth_above_source() {
        let mut dmd = Dmd::new(MockTransport::new(), Timing::immediate());
        dmd.set_input_source(InputSource::Flash, ParallelBitDepth::Bits16)
            .unwrap();
        let commands = dmd.transport().commands();
        assert_eq!(commands[0].command(), 0x1A00);
        assert_eq!(commands[0].payload(), &[0b0001_1010]);
    }

    #[test]
    fn port_clock_byte_layout() {
        let definition = PortClockDefinition {
            data_port: 2,
            pixel_clock: 1,
            data_enable: 1,
            vhsync: 1,
        };
        assert_eq!(definition.to_byte(), 0b0011_0110);
        assert_eq!(PortClockDefinition::from_byte(0b0011_0110), definition);
    }

    #[test]
    fn lock_hdmi_selects_parallel_input() {
        let mut dmd = Dmd::new(MockTransport::new(), Timing::immediate());
        dmd.lock_hdmi().unwrap();
        let commands = dmd.transport().commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].command(), 0x1A01);
        assert_eq!(commands[0].payload(), &[1]);
        assert_eq!(commands[1].command(), 0x1A00);
        assert_eq!(commands[1].payload(), &[0]);
    }

    #[test]
    fn source_lock_skips_port_query_when_unlocked() {
        let mut mock = MockTransport::new();
        mock.push_reply(&[0b0000_0001]);
        let mut dmd = Dmd::new(mock, Timing::immediate());
        assert_eq!(dmd.get_source_lock().unwrap(), SourceLock::NotLocked);
        assert_eq!(dmd.transport().commands().len(), 1);
    }

    #[test]
    fn source_lock_reports_displayport() {
        let mut mock = MockTransport::new();
        mock.push_reply(&[0b0000_1000]).push_reply(&[2]);
        let mut dmd = Dmd::new(mock, Timing::immediate());
        assert_eq!(dmd.get_source_lock().unwrap(), SourceLock::DisplayPort);
    }

    #[test]
    fn test_pattern_range_is_checked_before_sending() {
        let mut dmd = Dmd::new(MockTransport::new(), Timing::immediate());
        let err = dmd.set_test_pattern(11).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidParameter { value: 11, .. }));
        assert_eq!(dmd.transport().calls(), 0);
    }

    #[test]
    fn trigger_out1_payload() {
        let mut dmd = Dmd::new(MockTransport::new(), Timing::immediate());
        dmd.set_trigger_out1(true, 0x0102, 0x0304).unwrap();
        let commands = dmd.transport().commands();
        assert_eq!(commands[0].payload(), &[1, 0x02, 0x01, 0x04, 0x03]);
    }
}
