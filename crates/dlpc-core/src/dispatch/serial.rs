use std::thread;

use log::{debug, warn};

use crate::config::Timing;
use crate::error::ProtocolError;
use crate::protocols::serial::{self, SerialFrame, layout};
use crate::transport::Transport;

/// Request/response exchange on the RS485 line.
///
/// Invalid replies are reported, never retried; callers decide whether to
/// repeat the whole operation.
pub struct SerialDispatcher<T> {
    transport: T,
    address: u8,
    timing: Timing,
}

impl<T: Transport> SerialDispatcher<T> {
    pub fn new(transport: T, address: u8, timing: Timing) -> Self {
        Self {
            transport,
            address,
            timing,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Frame `data` for this device's address.
    pub fn build(&self, function_code: u8, data: [u8; 3]) -> SerialFrame {
        SerialFrame::new(self.address, function_code, data)
    }

    /// Write `frame`, wait the settle delay, read the fixed 10-byte window
    /// and validate it.
    pub fn send_and_receive(
        &mut self,
        frame: &SerialFrame,
        expected_function: u8,
    ) -> Result<SerialFrame, ProtocolError> {
        let bytes = frame.to_bytes();
        debug!("rs485 out {:02X?}", bytes);
        self.transport.write(&bytes)?;

        thread::sleep(self.timing.serial_settle());
        let response = self.transport.read(layout::FRAME_LEN)?;
        debug!("rs485 in {:02X?}", response);

        serial::parse(&response, self.address, expected_function).map_err(|err| {
            warn!("invalid RS485 response to function 0x{expected_function:02X}: {err}");
            ProtocolError::InvalidResponse(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SerialDispatcher;
    use crate::config::Timing;
    use crate::error::ProtocolError;
    use crate::protocols::serial::{SerialFrame, SerialFrameError};
    use crate::transport::MockTransport;

    #[test]
    fn valid_reply_is_returned() {
        let mut dispatcher = SerialDispatcher::new(MockTransport::new(), 0x01, Timing::immediate());
        let reply = SerialFrame::new(0x01, 0x05, [0x00, 0x01, 0x2C]);
        dispatcher.transport_mut().push_raw(reply.to_bytes().to_vec());

        let request = dispatcher.build(0x05, [0x01, 0x00, 0x00]);
        let parsed = dispatcher.send_and_receive(&request, 0x05).unwrap();
        assert_eq!(parsed, reply);
        assert_eq!(dispatcher.transport().writes()[0], request.to_bytes().to_vec());
    }

    #[test]
    fn short_window_is_invalid_and_not_retried() {
        let mut dispatcher = SerialDispatcher::new(MockTransport::new(), 0x01, Timing::immediate());
        dispatcher.transport_mut().push_raw(vec![0x55, 0xAA, 0x01]);
        let request = dispatcher.build(0x02, [0x01, 0x00, 0x00]);
        let err = dispatcher.send_and_receive(&request, 0x02).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidResponse(SerialFrameError::WrongLength { .. })
        ));
        assert_eq!(dispatcher.transport().calls(), 2);
    }

    #[test]
    fn reply_from_other_address_is_rejected() {
        let mut dispatcher = SerialDispatcher::new(MockTransport::new(), 0x03, Timing::immediate());
        let reply = SerialFrame::new(0x01, 0x06, [0x01, 0x00, 0x00]);
        dispatcher.transport_mut().push_raw(reply.to_bytes().to_vec());
        let request = dispatcher.build(0x06, [0x01, 0x00, 0x00]);
        let err = dispatcher.send_and_receive(&request, 0x06).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidResponse(SerialFrameError::AddressMismatch { .. })
        ));
    }
}
