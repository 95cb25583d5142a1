use std::io::{ErrorKind, Read, Write};

use log::info;
use serialport::{DataBits, Parity, SerialPort, StopBits};

use super::{Transport, TransportError};
use crate::config::SerialConfig;

/// RS485 adapter behind a serial port, fixed at 8N1.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    timeout_ms: u64,
}

impl SerialTransport {
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(config.timeout())
            .open()
            .map_err(|e| TransportError::OpenFailed(format!("{}: {e}", config.port)))?;
        info!("opened {} at {} baud", config.port, config.baud_rate);
        Ok(Self {
            port,
            timeout_ms: config.timeout_ms,
        })
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    /// Collect bytes until `max_len` arrive or the line goes quiet; a short
    /// window is returned as-is for the frame parser to reject.
    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, TransportError> {
        let mut received = Vec::with_capacity(max_len);
        let mut buf = [0u8; 64];
        while received.len() < max_len {
            let want = (max_len - received.len()).min(buf.len());
            match self.port.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => received.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        if received.is_empty() && max_len > 0 {
            return Err(TransportError::Timeout {
                timeout_ms: self.timeout_ms,
            });
        }
        Ok(received)
    }
}
