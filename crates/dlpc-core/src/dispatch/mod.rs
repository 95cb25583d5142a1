//! Request/response plumbing between framing and transports.
//!
//! `Dispatcher` owns the USB transaction: serialize, split into 64-byte
//! packets, write each packet with one retry on transient failure, then
//! (for reads) wait the settle delay and read one 64-byte reply window.
//! `SerialDispatcher` does the same for the RS485 channel without retries.
//!
//! Transactions are strictly sequential; replies are matched to requests only
//! by ordering, so one dispatcher must never be shared between concurrent
//! callers.

mod chunk;
mod retry;
mod serial;

pub use chunk::{WireChunk, chunk_frame};
pub use retry::{RetryPolicy, retry_transient};
pub use serial::SerialDispatcher;

use std::thread;

use log::{debug, trace};

use crate::config::Timing;
use crate::error::ProtocolError;
use crate::protocols::usb::{self, CommandFrame, Direction, FrameError, ReplyFrame, layout};
use crate::transport::Transport;

/// Sequential USB command dispatcher.
pub struct Dispatcher<T> {
    transport: T,
    timing: Timing,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, timing: Timing) -> Self {
        Self { transport, timing }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send one frame and, when `expect_reply` is set, read its reply.
    ///
    /// # Errors
    /// - `Transport` when a packet write fails twice or the read fails.
    /// - `Device` when the reply flag byte has the error bit set.
    /// - `Frame` when the reply is short or truncated.
    pub fn transact(
        &mut self,
        frame: &CommandFrame,
        expect_reply: bool,
    ) -> Result<Option<ReplyFrame>, ProtocolError> {
        let bytes = usb::serialize(frame);
        let chunks = chunk_frame(&bytes);
        debug!(
            "cmd 0x{:04X} seq {} {:?}: {} bytes in {} packet(s)",
            frame.command(),
            frame.sequence(),
            frame.direction(),
            bytes.len(),
            chunks.len()
        );

        let policy = RetryPolicy::once(self.timing.write_retry_backoff());
        for chunk in &chunks {
            trace!("out {:02X?}", chunk.as_bytes());
            retry_transient(policy, || self.transport.write(chunk.as_bytes()))?;
        }

        if !expect_reply {
            return Ok(None);
        }

        thread::sleep(self.timing.reply_settle());
        let raw = self.transport.read(layout::REPLY_READ_LEN)?;
        trace!("in {:02X?}", raw);

        let flags = *raw.first().ok_or(FrameError::ShortReply {
            needed: layout::REPLY_DATA_OFFSET,
            actual: 0,
        })?;
        if flags & layout::FLAG_ERROR != 0 {
            return Err(ProtocolError::Device {
                command: frame.command(),
                flags,
            });
        }
        let reply = usb::parse(&raw)?;
        debug!(
            "reply seq {} for 0x{:04X}: {} data byte(s)",
            reply.sequence,
            frame.command(),
            reply.length
        );
        Ok(Some(reply))
    }

    /// Read-direction command that waits for the reply.
    pub fn request(
        &mut self,
        sequence: u8,
        command: u16,
        payload: &[u8],
    ) -> Result<ReplyFrame, ProtocolError> {
        let frame = usb::build(Direction::Read, sequence, command, payload)?;
        let reply = self.transact(&frame, true)?;
        reply.ok_or(ProtocolError::Frame(FrameError::ShortReply {
            needed: layout::REPLY_DATA_OFFSET,
            actual: 0,
        }))
    }

    /// Write-direction command; no reply is awaited.
    pub fn send(&mut self, sequence: u8, command: u16, payload: &[u8]) -> Result<(), ProtocolError> {
        let frame = usb::build(Direction::Write, sequence, command, payload)?;
        self.transact(&frame, false)?;
        Ok(())
    }
}
