//! Contract with the external pattern-compression codec.
//!
//! The compression format itself is not implemented here; on-the-fly upload
//! only needs the encoded byte stream and the length to announce.

use std::error::Error;

use crate::error::ProtocolError;

/// Row-major binary image; any non-zero pixel is "on".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl BinaryImage {
    /// # Errors
    /// `InvalidParameter` when `pixels.len() != width * height` or the
    /// dimensions overflow.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, ProtocolError> {
        let expected = pixel_count(width, height)? as u64;
        if pixels.len() as u64 != expected {
            return Err(ProtocolError::InvalidParameter {
                name: "pixel count",
                value: pixels.len() as u64,
                min: expected,
                max: expected,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// All-off image.
    pub fn blank(width: usize, height: usize) -> Result<Self, ProtocolError> {
        let count = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; count],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_on(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x] != 0)
    }
}

fn pixel_count(width: usize, height: usize) -> Result<usize, ProtocolError> {
    width
        .checked_mul(height)
        .ok_or(ProtocolError::InvalidParameter {
            name: "image size",
            value: u64::MAX,
            min: 0,
            max: usize::MAX as u64,
        })
}

/// Output of the codec: the stream to upload and the length to announce.
///
/// The announced length always equals the stream length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPatterns {
    bytes: Vec<u8>,
    length: u32,
}

impl EncodedPatterns {
    /// # Errors
    /// `InvalidParameter` when the stream does not fit the 32-bit length
    /// field of the load-init command.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ProtocolError> {
        let length = announced_length(bytes.len())?;
        Ok(Self { bytes, length })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}

fn announced_length(len: usize) -> Result<u32, ProtocolError> {
    u32::try_from(len).map_err(|_| ProtocolError::InvalidParameter {
        name: "encoded stream length",
        value: len as u64,
        min: 0,
        max: u64::from(u32::MAX),
    })
}

pub type EncodeError = Box<dyn Error + Send + Sync>;

/// Image-to-stream compression used by on-the-fly loading.
pub trait PatternEncoder {
    fn encode(&mut self, images: &[BinaryImage]) -> Result<EncodedPatterns, EncodeError>;
}

#[cfg(test)]
mod tests {
    use super::{BinaryImage, EncodedPatterns, announced_length};
    use crate::error::ProtocolError;

    #[test]
    fn new_checks_pixel_count() {
        let err = BinaryImage::new(4, 2, vec![0; 7]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidParameter { value: 7, min: 8, .. }
        ));
        let image = BinaryImage::new(2, 2, vec![0, 1, 0, 0]).unwrap();
        assert_eq!(image.is_on(1, 0), Some(true));
        assert_eq!(image.is_on(0, 1), Some(false));
        assert_eq!(image.is_on(2, 0), None);
    }

    #[test]
    fn from_bytes_announces_stream_length() {
        let encoded = EncodedPatterns::from_bytes(vec![1, 2, 3]).unwrap();
        assert_eq!(encoded.length(), 3);
        assert_eq!(encoded.bytes(), &[1, 2, 3]);
        assert_eq!(BinaryImage::blank(3, 2).unwrap().pixels().len(), 6);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let err = BinaryImage::blank(usize::MAX, 2).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidParameter { name: "image size", .. }
        ));
        assert!(BinaryImage::new(usize::MAX, 2, Vec::new()).is_err());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn stream_length_must_fit_u32() {
        assert_eq!(announced_length(u32::MAX as usize).unwrap(), u32::MAX);
        let err = announced_length(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidParameter {
                name: "encoded stream length",
                value: 0x1_0000_0000,
                ..
            }
        ));
    }
}
