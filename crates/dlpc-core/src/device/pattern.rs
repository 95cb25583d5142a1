use log::{debug, info};

use super::{Dmd, commands};
use crate::codec::{BinaryImage, PatternEncoder};
use crate::error::{ProtocolError, check_range};
use crate::transport::Transport;

/// Bytes of encoded image data per on-the-fly load command.
pub const OTF_CHUNK_LEN: usize = 60;

/// Highest LUT slot the controller accepts.
pub const MAX_LUT_INDEX: u16 = 399;
/// Highest bit position within a 24-bit image.
pub const MAX_BIT_POSITION: u8 = 23;
const MAX_IMAGE_INDEX: u16 = 0x07FF;
const MAX_TIME_US: u32 = 0x00FF_FFFF;

/// Sequencer control opcodes for command 0x1A24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSequence {
    Stop,
    Pause,
    Start,
}

impl PatternSequence {
    pub fn code(self) -> u8 {
        match self {
            PatternSequence::Stop => 0,
            PatternSequence::Pause => 1,
            PatternSequence::Start => 2,
        }
    }
}

/// LED channels lit while a pattern is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternColor {
    None,
    Red,
    Green,
    RedGreen,
    Blue,
    BlueRed,
    BlueGreen,
    White,
}

impl PatternColor {
    pub fn bits(self) -> u8 {
        match self {
            PatternColor::None => 0,
            PatternColor::Red => 1,
            PatternColor::Green => 2,
            PatternColor::RedGreen => 3,
            PatternColor::Blue => 4,
            PatternColor::BlueRed => 5,
            PatternColor::BlueGreen => 6,
            PatternColor::White => 7,
        }
    }
}

/// One pattern LUT definition (command 0x1A34).
///
/// Payload layout (12 bytes):
///
/// | bytes  | content                                                     |
/// |--------|-------------------------------------------------------------|
/// | 0..2   | LUT index, LE                                               |
/// | 2..5   | exposure (µs), LE 24-bit                                    |
/// | 5      | bit0 clear after exposure, bits 3:1 bit depth - 1, bits 6:4 color, bit7 wait for trigger |
/// | 6..9   | dark time (µs), LE 24-bit                                   |
/// | 9      | bit0 disable trigger 2, bit1 extended bit depth             |
/// | 10..12 | bits 10:0 image pattern index, bits 15:11 bit position, LE  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternLutEntry {
    pub index: u16,
    pub exposure_us: u32,
    pub dark_us: u32,
    pub color: PatternColor,
    pub bit_depth: u8,
    pub clear_after_exposure: bool,
    pub wait_for_trigger: bool,
    pub trigger2_disabled: bool,
    pub extended_bit_depth: bool,
    pub image_pattern_index: u16,
    pub bit_position: u8,
}

impl Default for PatternLutEntry {
    fn default() -> Self {
        Self {
            index: 0,
            exposure_us: 15_000,
            dark_us: 0,
            color: PatternColor::Red,
            bit_depth: 8,
            clear_after_exposure: false,
            wait_for_trigger: false,
            trigger2_disabled: false,
            extended_bit_depth: false,
            image_pattern_index: 0,
            bit_position: 0,
        }
    }
}

impl PatternLutEntry {
    pub const PAYLOAD_LEN: usize = 12;

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        check_range("LUT index", self.index.into(), 0, MAX_LUT_INDEX.into())?;
        check_range("exposure", self.exposure_us.into(), 0, MAX_TIME_US.into())?;
        check_range("dark time", self.dark_us.into(), 0, MAX_TIME_US.into())?;
        check_range("bit depth", self.bit_depth.into(), 1, 8)?;
        check_range(
            "image pattern index",
            self.image_pattern_index.into(),
            0,
            MAX_IMAGE_INDEX.into(),
        )?;
        check_range("bit position", self.bit_position.into(), 0, MAX_BIT_POSITION.into())?;
        Ok(())
    }

    /// Byte 5.
    pub fn control_byte(&self) -> u8 {
        u8::from(self.clear_after_exposure)
            | ((self.bit_depth.wrapping_sub(1) & 0x07) << 1)
            | ((self.color.bits() & 0x07) << 4)
            | (u8::from(self.wait_for_trigger) << 7)
    }

    /// Byte 9.
    pub fn trigger_byte(&self) -> u8 {
        u8::from(self.trigger2_disabled) | (u8::from(self.extended_bit_depth) << 1)
    }

    /// Bytes 10..12 as a word.
    pub fn image_word(&self) -> u16 {
        (self.image_pattern_index & MAX_IMAGE_INDEX) | (u16::from(self.bit_position & 0x1F) << 11)
    }

    /// Validated wire payload.
    pub fn to_payload(&self) -> Result<[u8; Self::PAYLOAD_LEN], ProtocolError> {
        self.validate()?;
        let mut payload = [0u8; Self::PAYLOAD_LEN];
        payload[0..2].copy_from_slice(&self.index.to_le_bytes());
        payload[2..5].copy_from_slice(&self.exposure_us.to_le_bytes()[..3]);
        payload[5] = self.control_byte();
        payload[6..9].copy_from_slice(&self.dark_us.to_le_bytes()[..3]);
        payload[9] = self.trigger_byte();
        payload[10..12].copy_from_slice(&self.image_word().to_le_bytes());
        Ok(payload)
    }
}

impl<T: Transport> Dmd<T> {
    pub fn set_pattern_sequence(&mut self, action: PatternSequence) -> Result<(), ProtocolError> {
        debug!("pattern sequence {action:?}");
        self.write(commands::PATTERN_START_STOP, &[action.code()])
    }

    pub fn start_pattern(&mut self) -> Result<(), ProtocolError> {
        self.set_pattern_sequence(PatternSequence::Start)
    }

    pub fn pause_pattern(&mut self) -> Result<(), ProtocolError> {
        self.set_pattern_sequence(PatternSequence::Pause)
    }

    pub fn stop_pattern(&mut self) -> Result<(), ProtocolError> {
        self.set_pattern_sequence(PatternSequence::Stop)
    }

    /// Store one LUT entry on the device.
    ///
    /// # Errors
    /// `InvalidParameter` (nothing sent) when a field is out of range.
    pub fn setup_pattern_lut_definition(
        &mut self,
        entry: &PatternLutEntry,
    ) -> Result<(), ProtocolError> {
        let payload = entry.to_payload()?;
        self.write(commands::PATTERN_LUT_DEFINITION, &payload)
    }

    /// Play LUT entries `0..entry_count`; `repeat_count == 0` repeats forever.
    pub fn start_pattern_from_lut(
        &mut self,
        entry_count: u16,
        repeat_count: u32,
    ) -> Result<(), ProtocolError> {
        check_range(
            "LUT entry count",
            entry_count.into(),
            1,
            u64::from(MAX_LUT_INDEX) + 1,
        )?;
        let mut payload = [0u8; 6];
        payload[0..2].copy_from_slice(&(entry_count & 0x03FF).to_le_bytes());
        payload[2..6].copy_from_slice(&repeat_count.to_le_bytes());
        self.write(commands::PATTERN_LUT_CONFIG, &payload)
    }

    /// Compress `images` and stream them into pattern memory.
    ///
    /// Announces the encoded length on the init command, then sends the
    /// stream in order, 60 bytes per load command, with nothing interleaved.
    /// Returns the number of load commands sent.
    pub fn load_pattern_on_the_fly<E: PatternEncoder>(
        &mut self,
        encoder: &mut E,
        images: &[BinaryImage],
        primary: bool,
    ) -> Result<usize, ProtocolError> {
        let encoded = encoder
            .encode(images)
            .map_err(|err| ProtocolError::Encode(err.to_string()))?;
        let (init, load) = if primary {
            (commands::OTF_INIT_PRIMARY, commands::OTF_LOAD_PRIMARY)
        } else {
            (commands::OTF_INIT_SECONDARY, commands::OTF_LOAD_SECONDARY)
        };

        self.write(init, &encoded.length().to_le_bytes())?;
        let mut sent = 0;
        for chunk in encoded.bytes().chunks(OTF_CHUNK_LEN) {
            self.write(load, chunk)?;
            sent += 1;
        }
        info!(
            "loaded {} image(s), {} encoded bytes in {sent} command(s)",
            images.len(),
            encoded.bytes().len()
        );
        Ok(sent)
    }
}
