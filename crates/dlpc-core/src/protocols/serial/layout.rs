pub const HEADER: [u8; 2] = [0x55, 0xAA];
pub const TAIL: [u8; 2] = [0xDA, 0xC3];

pub const FRAME_LEN: usize = 10;
pub const HEADER_RANGE: std::ops::Range<usize> = 0..2;
pub const ADDRESS_OFFSET: usize = 2;
pub const FUNCTION_OFFSET: usize = 3;
pub const DATA_RANGE: std::ops::Range<usize> = 4..7;
pub const CHECKSUM_OFFSET: usize = 7;
pub const TAIL_RANGE: std::ops::Range<usize> = 8..10;
/// Function code through the reserved data byte.
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 3..7;

pub const DEFAULT_ADDRESS: u8 = 0x01;
