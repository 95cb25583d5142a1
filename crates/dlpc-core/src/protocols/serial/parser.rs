use super::error::SerialFrameError;
use super::layout;

/// One RS485 frame: header, address, function code, three data bytes
/// (byte0, byte1, reserved), checksum, tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialFrame {
    pub address: u8,
    pub function_code: u8,
    pub data: [u8; 3],
}

impl SerialFrame {
    pub fn new(address: u8, function_code: u8, data: [u8; 3]) -> Self {
        Self {
            address,
            function_code,
            data,
        }
    }

    /// Sum of function code and data bytes, modulo 256.
    pub fn checksum(&self) -> u8 {
        checksum(&[self.function_code, self.data[0], self.data[1], self.data[2]])
    }

    pub fn to_bytes(&self) -> [u8; layout::FRAME_LEN] {
        let mut bytes = [0u8; layout::FRAME_LEN];
        bytes[layout::HEADER_RANGE].copy_from_slice(&layout::HEADER);
        bytes[layout::ADDRESS_OFFSET] = self.address;
        bytes[layout::FUNCTION_OFFSET] = self.function_code;
        bytes[layout::DATA_RANGE].copy_from_slice(&self.data);
        bytes[layout::CHECKSUM_OFFSET] = self.checksum();
        bytes[layout::TAIL_RANGE].copy_from_slice(&layout::TAIL);
        bytes
    }
}

pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Validate a reply against the configured address and expected function.
///
/// # Examples
/// ```
/// use dlpc_core::protocols::serial::{SerialFrame, parse};
///
/// let frame = SerialFrame::new(0x01, 0x03, [0x07, 0xD0, 0x00]);
/// let parsed = parse(&frame.to_bytes(), 0x01, 0x03).unwrap();
/// assert_eq!(parsed, frame);
/// ```
///
/// # Errors
/// `SerialFrameError` naming the first check that failed.
pub fn parse(
    bytes: &[u8],
    address: u8,
    expected_function: u8,
) -> Result<SerialFrame, SerialFrameError> {
    let bytes: &[u8; layout::FRAME_LEN] =
        bytes
            .try_into()
            .map_err(|_| SerialFrameError::WrongLength {
                expected: layout::FRAME_LEN,
                actual: bytes.len(),
            })?;

    let header = [bytes[0], bytes[1]];
    if header != layout::HEADER {
        return Err(SerialFrameError::BadHeader(header));
    }
    let tail = [bytes[layout::TAIL_RANGE.start], bytes[layout::TAIL_RANGE.start + 1]];
    if tail != layout::TAIL {
        return Err(SerialFrameError::BadTail(tail));
    }
    if bytes[layout::ADDRESS_OFFSET] != address {
        return Err(SerialFrameError::AddressMismatch {
            expected: address,
            actual: bytes[layout::ADDRESS_OFFSET],
        });
    }
    if bytes[layout::FUNCTION_OFFSET] != expected_function {
        return Err(SerialFrameError::FunctionMismatch {
            expected: expected_function,
            actual: bytes[layout::FUNCTION_OFFSET],
        });
    }
    let computed = checksum(&bytes[layout::CHECKSUM_RANGE]);
    if computed != bytes[layout::CHECKSUM_OFFSET] {
        return Err(SerialFrameError::ChecksumMismatch {
            expected: computed,
            actual: bytes[layout::CHECKSUM_OFFSET],
        });
    }

    let mut data = [0u8; 3];
    data.copy_from_slice(&bytes[layout::DATA_RANGE]);
    Ok(SerialFrame::new(address, expected_function, data))
}

#[cfg(test)]
mod tests {
    use super::{SerialFrame, parse};
    use crate::protocols::serial::error::SerialFrameError;

    #[test]
    fn checksum_covers_function_and_data_only() {
        let frame = SerialFrame::new(0x01, 0x03, [0x01, 0x00, 0x00]);
        assert_eq!(frame.checksum(), 0x04);
        let frame = SerialFrame::new(0x7F, 0xFF, [0xFF, 0x02, 0x00]);
        assert_eq!(frame.checksum(), 0x00);
    }

    #[test]
    fn to_bytes_layout() {
        let frame = SerialFrame::new(0x01, 0x02, [0x01, 0x00, 0x00]);
        assert_eq!(
            frame.to_bytes(),
            [0x55, 0xAA, 0x01, 0x02, 0x01, 0x00, 0x00, 0x03, 0xDA, 0xC3]
        );
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = parse(&[0x55, 0xAA, 0x01], 0x01, 0x02).unwrap_err();
        assert_eq!(
            err,
            SerialFrameError::WrongLength {
                expected: 10,
                actual: 3
            }
        );
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        let mut bytes = SerialFrame::new(0x01, 0x05, [0x00, 0x01, 0x2C]).to_bytes();
        bytes[7] ^= 0xFF;
        let err = parse(&bytes, 0x01, 0x05).unwrap_err();
        assert!(matches!(err, SerialFrameError::ChecksumMismatch { .. }));
    }

    #[test]
    fn parse_rejects_other_address_and_function() {
        let bytes = SerialFrame::new(0x02, 0x05, [0, 0, 0]).to_bytes();
        assert!(matches!(
            parse(&bytes, 0x01, 0x05),
            Err(SerialFrameError::AddressMismatch { expected: 1, actual: 2 })
        ));
        let bytes = SerialFrame::new(0x01, 0x06, [0, 0, 0]).to_bytes();
        assert!(matches!(
            parse(&bytes, 0x01, 0x05),
            Err(SerialFrameError::FunctionMismatch { expected: 5, actual: 6 })
        ));
    }

    #[test]
    fn parse_rejects_header_and_tail() {
        let mut bytes = SerialFrame::new(0x01, 0x02, [0, 0, 0]).to_bytes();
        bytes[0] = 0x00;
        assert!(matches!(
            parse(&bytes, 0x01, 0x02),
            Err(SerialFrameError::BadHeader([0x00, 0xAA]))
        ));
        let mut bytes = SerialFrame::new(0x01, 0x02, [0, 0, 0]).to_bytes();
        bytes[9] = 0x00;
        assert!(matches!(
            parse(&bytes, 0x01, 0x02),
            Err(SerialFrameError::BadTail([0xDA, 0x00]))
        ));
    }
}
