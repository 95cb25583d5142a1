//! Byte layout of the controller's USB command and reply frames.

/// Largest frame the controller buffers (header included).
pub const MAX_FRAME_LEN: usize = 512;
/// Flag + sequence + length (2) + command (2).
pub const HEADER_LEN: usize = 6;
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - HEADER_LEN;

pub const FLAG_OFFSET: usize = 0;
pub const SEQUENCE_OFFSET: usize = 1;
pub const LENGTH_RANGE: std::ops::Range<usize> = 2..4;
pub const COMMAND_RANGE: std::ops::Range<usize> = 4..6;
pub const PAYLOAD_OFFSET: usize = 6;
/// Reply data starts right after flag, sequence and length.
pub const REPLY_DATA_OFFSET: usize = 4;

/// Bit 7: host expects a reply.
pub const FLAG_READ: u8 = 0x80;
/// Bits 6..0 are the fixed pattern `1000000`.
pub const FLAG_FIXED: u8 = 0x40;
/// Bit 5 of a reply flag byte: the controller rejected the command.
pub const FLAG_ERROR: u8 = 0x20;

/// Bulk packet size on both endpoints.
pub const PACKET_LEN: usize = 64;
/// Payload bytes carried by the first packet after the header.
pub const FIRST_PACKET_PAYLOAD: usize = PACKET_LEN - HEADER_LEN;
/// Fixed read window for replies.
pub const REPLY_READ_LEN: usize = 64;

pub const OUT_ENDPOINT: u8 = 0x01;
pub const IN_ENDPOINT: u8 = 0x81;
