use crate::protocols::usb::layout;

/// One zero-padded 64-byte bulk packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireChunk([u8; layout::PACKET_LEN]);

impl WireChunk {
    fn padded(bytes: &[u8]) -> Self {
        let mut packet = [0u8; layout::PACKET_LEN];
        packet[..bytes.len()].copy_from_slice(bytes);
        Self(packet)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Split a serialized command into bulk packets.
///
/// The first packet carries the 6 header bytes and up to 58 payload bytes;
/// the rest of the payload follows in 64-byte packets without a repeated
/// header. The last packet is zero-padded.
///
/// # Examples
/// ```
/// use dlpc_core::dispatch::chunk_frame;
///
/// assert_eq!(chunk_frame(&[0u8; 64]).len(), 1);
/// assert_eq!(chunk_frame(&[0u8; 65]).len(), 2);
/// ```
pub fn chunk_frame(bytes: &[u8]) -> Vec<WireChunk> {
    if bytes.is_empty() {
        return Vec::new();
    }
    bytes.chunks(layout::PACKET_LEN).map(WireChunk::padded).collect()
}

#[cfg(test)]
mod tests {
    use super::chunk_frame;
    use crate::protocols::usb::{Direction, build, layout, serialize};

    fn chunks_for(payload_len: usize) -> Vec<Vec<u8>> {
        let payload: Vec<u8> = (1..=payload_len).map(|i| i as u8).collect();
        let frame = build(Direction::Write, 0, 0x1A2B, &payload).unwrap();
        chunk_frame(&serialize(&frame))
            .iter()
            .map(|chunk| chunk.as_bytes().to_vec())
            .collect()
    }

    #[test]
    fn fifty_eight_byte_payload_fits_one_packet() {
        let chunks = chunks_for(layout::FIRST_PACKET_PAYLOAD);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0][63], 58);
    }

    #[test]
    fn fifty_nine_byte_payload_needs_two_packets() {
        let chunks = chunks_for(layout::FIRST_PACKET_PAYLOAD + 1);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].len(), 64);
        assert_eq!(chunks[1][0], 59);
        assert!(chunks[1][1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn short_frame_is_zero_padded() {
        let chunks = chunks_for(1);
        assert_eq!(chunks.len(), 1);
        assert_eq!(&chunks[0][..7], &[0x40, 0x00, 0x03, 0x00, 0x2B, 0x1A, 0x01]);
        assert!(chunks[0][7..].iter().all(|b| *b == 0));
    }

    #[test]
    fn continuation_packets_carry_no_header() {
        let chunks = chunks_for(58 + 64 + 1);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1][0], 59);
        assert_eq!(chunks[2][0], 123);
    }
}
