use super::error::FrameError;

/// Bounds-checked access to a received frame.
pub struct FrameReader<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), FrameError> {
        if self.bytes.len() < needed {
            return Err(FrameError::ShortReply {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, FrameError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or(FrameError::ShortReply {
                needed: offset + 1,
                actual: self.bytes.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, FrameError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(FrameError::ShortReply {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], FrameError> {
        self.bytes.get(range.clone()).ok_or(FrameError::ShortReply {
            needed: range.end,
            actual: self.bytes.len(),
        })
    }

    /// Slice of `declared` bytes starting at `offset`, or `TruncatedPayload`.
    pub fn read_declared(&self, offset: usize, declared: usize) -> Result<&'a [u8], FrameError> {
        let available = self.bytes.len().saturating_sub(offset);
        if available < declared {
            return Err(FrameError::TruncatedPayload {
                declared,
                actual: available,
            });
        }
        self.read_slice(offset..offset + declared)
    }
}

#[cfg(test)]
mod tests {
    use super::FrameReader;
    use crate::protocols::usb::error::FrameError;

    #[test]
    fn read_u16_le_decodes_little_endian() {
        let reader = FrameReader::new(&[0x34, 0x12]);
        assert_eq!(reader.read_u16_le(0..2).unwrap(), 0x1234);
    }

    #[test]
    fn read_declared_reports_truncation() {
        let reader = FrameReader::new(&[0, 0, 0, 0, 1, 2]);
        let err = reader.read_declared(4, 3).unwrap_err();
        assert_eq!(
            err,
            FrameError::TruncatedPayload {
                declared: 3,
                actual: 2
            }
        );
    }
}
