use std::collections::VecDeque;

use crate::protocols::usb::{CommandFrame, encode_reply, layout, parse_command};

use super::{Transport, TransportError};

#[derive(Debug)]
enum ScriptedRead {
    Data(Vec<u8>),
    ErrorFlag,
    Raw(Vec<u8>),
    Fail(TransportError),
}

/// In-memory transport with scripted reads.
///
/// Every written buffer is recorded verbatim. Reads are served from a FIFO
/// of scripted replies; `push_reply` wraps its data in a reply frame that
/// echoes the sequence byte of the last command written, so facade code can
/// be driven without hand-built frames.
///
/// # Examples
/// ```
/// use dlpc_core::{MockTransport, Transport};
///
/// let mut mock = MockTransport::new();
/// mock.push_raw(vec![1, 2, 3]);
/// mock.write(&[0xAA]).unwrap();
/// assert_eq!(mock.read(8).unwrap(), vec![1, 2, 3]);
/// assert_eq!(mock.calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    writes: Vec<Vec<u8>>,
    script: VecDeque<ScriptedRead>,
    failing_writes: usize,
    write_calls: usize,
    read_calls: usize,
    closed: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a well-formed reply carrying `data`.
    pub fn push_reply(&mut self, data: &[u8]) -> &mut Self {
        self.script.push_back(ScriptedRead::Data(data.to_vec()));
        self
    }

    /// Queue a reply with the error bit set in the flag byte.
    pub fn push_error_reply(&mut self) -> &mut Self {
        self.script.push_back(ScriptedRead::ErrorFlag);
        self
    }

    /// Queue bytes returned exactly as given.
    pub fn push_raw(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.script.push_back(ScriptedRead::Raw(bytes));
        self
    }

    /// Queue a failing read.
    pub fn push_read_failure(&mut self, err: TransportError) -> &mut Self {
        self.script.push_back(ScriptedRead::Fail(err));
        self
    }

    /// Make the next `count` writes fail with a timeout.
    pub fn fail_next_writes(&mut self, count: usize) -> &mut Self {
        self.failing_writes = count;
        self
    }

    /// Fail every following call with `TransportError::Closed`.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Buffers that were written successfully, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    /// Total number of transport calls, failed ones included.
    pub fn calls(&self) -> usize {
        self.write_calls + self.read_calls
    }

    /// Scripted reads not consumed yet.
    pub fn pending_reads(&self) -> usize {
        self.script.len()
    }

    /// Reassemble the USB command frames carried by the written packets.
    ///
    /// Packets are joined until the length declared in the first packet's
    /// header is satisfied; trailing zero padding is dropped.
    pub fn commands(&self) -> Vec<CommandFrame> {
        let mut frames = Vec::new();
        let mut pending: Vec<u8> = Vec::new();
        let mut expected = 0usize;
        for packet in &self.writes {
            if pending.is_empty() {
                if packet.len() < layout::REPLY_DATA_OFFSET {
                    continue;
                }
                let declared = u16::from_le_bytes([
                    packet[layout::LENGTH_RANGE.start],
                    packet[layout::LENGTH_RANGE.start + 1],
                ]);
                expected = layout::REPLY_DATA_OFFSET + declared as usize;
            }
            pending.extend_from_slice(packet);
            if pending.len() >= expected {
                pending.truncate(expected);
                if let Ok(frame) = parse_command(&pending) {
                    frames.push(frame);
                }
                pending.clear();
            }
        }
        frames
    }

    fn last_sequence(&self) -> u8 {
        self.commands()
            .last()
            .map(CommandFrame::sequence)
            .unwrap_or_default()
    }
}

impl Transport for MockTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.write_calls += 1;
        if self.closed {
            return Err(TransportError::Closed);
        }
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(TransportError::Timeout { timeout_ms: 0 });
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        self.read_calls += 1;
        if self.closed {
            return Err(TransportError::Closed);
        }
        let scripted = self
            .script
            .pop_front()
            .ok_or_else(|| TransportError::ReadFailed("no scripted reply".to_string()))?;
        let mut bytes = match scripted {
            ScriptedRead::Data(data) => encode_reply(0x00, self.last_sequence(), &data),
            ScriptedRead::ErrorFlag => encode_reply(layout::FLAG_ERROR, self.last_sequence(), &[]),
            ScriptedRead::Raw(bytes) => return Ok(bytes),
            ScriptedRead::Fail(err) => return Err(err),
        };
        bytes.resize(max_len, 0);
        Ok(bytes)
    }
}
