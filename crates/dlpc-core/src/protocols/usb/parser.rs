use super::error::FrameError;
use super::layout;
use super::reader::FrameReader;

/// Whether the host expects the controller to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// A command ready to be serialized.
///
/// Only constructible through [`build`], which enforces the 512-byte
/// frame limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    direction: Direction,
    sequence: u8,
    command: u16,
    payload: Vec<u8>,
}

impl CommandFrame {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    pub fn command(&self) -> u16 {
        self.command
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialized length (header + payload).
    pub fn wire_len(&self) -> usize {
        layout::HEADER_LEN + self.payload.len()
    }
}

/// Decoded controller reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyFrame {
    /// Bit 5 of the flag byte.
    pub error_flag: bool,
    pub flags: u8,
    pub sequence: u8,
    /// Data length declared by the reply header.
    pub length: u16,
    /// Exactly `length` bytes.
    pub data: Vec<u8>,
}

/// Build a command frame.
///
/// # Examples
/// ```
/// use dlpc_core::protocols::usb::{Direction, build};
///
/// let frame = build(Direction::Write, 1, 0x1A1B, &[1]).unwrap();
/// assert_eq!(frame.command(), 0x1A1B);
/// assert!(build(Direction::Write, 1, 0x1A1B, &[0; 507]).is_err());
/// ```
///
/// # Errors
/// `FrameError::PayloadTooLarge` when header plus payload exceed 512 bytes.
pub fn build(
    direction: Direction,
    sequence: u8,
    command: u16,
    payload: &[u8],
) -> Result<CommandFrame, FrameError> {
    if payload.len() > layout::MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge {
            len: payload.len(),
            max: layout::MAX_PAYLOAD_LEN,
        });
    }
    Ok(CommandFrame {
        direction,
        sequence,
        command,
        payload: payload.to_vec(),
    })
}

/// Flag byte for a command: bit 7 selects read, bits 6..0 are fixed.
pub fn flag_byte(direction: Direction) -> u8 {
    match direction {
        Direction::Read => layout::FLAG_READ | layout::FLAG_FIXED,
        Direction::Write => layout::FLAG_FIXED,
    }
}

/// Serialize a frame: flag, sequence, LE length (payload + 2), LE command,
/// payload.
pub fn serialize(frame: &CommandFrame) -> Vec<u8> {
    // build() caps the payload at 506 bytes, so the length always fits.
    let length = (frame.payload.len() + 2) as u16;
    let mut bytes = Vec::with_capacity(frame.wire_len());
    bytes.push(flag_byte(frame.direction));
    bytes.push(frame.sequence);
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&frame.command.to_le_bytes());
    bytes.extend_from_slice(&frame.payload);
    bytes
}

/// Decode a reply read from the IN endpoint.
///
/// Trailing padding past the declared length is ignored.
///
/// # Examples
/// ```
/// use dlpc_core::protocols::usb::{encode_reply, parse};
///
/// let mut raw = encode_reply(0x00, 9, &[1, 2]);
/// raw.resize(64, 0);
/// let reply = parse(&raw).unwrap();
/// assert_eq!(reply.sequence, 9);
/// assert_eq!(reply.data, vec![1, 2]);
/// ```
///
/// # Errors
/// `ShortReply` when the 4 header bytes are missing, `TruncatedPayload` when
/// fewer than `length` data bytes follow.
pub fn parse(bytes: &[u8]) -> Result<ReplyFrame, FrameError> {
    let reader = FrameReader::new(bytes);
    reader.require_len(layout::REPLY_DATA_OFFSET)?;

    let flags = reader.read_u8(layout::FLAG_OFFSET)?;
    let sequence = reader.read_u8(layout::SEQUENCE_OFFSET)?;
    let length = reader.read_u16_le(layout::LENGTH_RANGE)?;
    let data = reader.read_declared(layout::REPLY_DATA_OFFSET, length as usize)?;

    Ok(ReplyFrame {
        error_flag: flags & layout::FLAG_ERROR != 0,
        flags,
        sequence,
        length,
        data: data.to_vec(),
    })
}

/// Decode a serialized command the way the controller does.
///
/// # Errors
/// Same as [`parse`], plus `MissingCommand` when the declared length is below 2.
pub fn parse_command(bytes: &[u8]) -> Result<CommandFrame, FrameError> {
    let reader = FrameReader::new(bytes);
    reader.require_len(layout::HEADER_LEN)?;

    let flags = reader.read_u8(layout::FLAG_OFFSET)?;
    let sequence = reader.read_u8(layout::SEQUENCE_OFFSET)?;
    let length = reader.read_u16_le(layout::LENGTH_RANGE)?;
    if length < 2 {
        return Err(FrameError::MissingCommand { length });
    }
    let command = reader.read_u16_le(layout::COMMAND_RANGE)?;
    let payload = reader.read_declared(layout::PAYLOAD_OFFSET, length as usize - 2)?;
    let direction = if flags & layout::FLAG_READ != 0 {
        Direction::Read
    } else {
        Direction::Write
    };
    build(direction, sequence, command, payload)
}

/// Encode a reply as the controller sends it (unpadded).
pub fn encode_reply(flags: u8, sequence: u8, data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(layout::REPLY_DATA_OFFSET + data.len());
    bytes.push(flags);
    bytes.push(sequence);
    bytes.extend_from_slice(&(data.len() as u16).to_le_bytes());
    bytes.extend_from_slice(data);
    bytes
}
