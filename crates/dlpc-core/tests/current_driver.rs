use dlpc_core::protocols::serial::SerialFrame;
use dlpc_core::{CurrentDriver, DriverAlarm, MockTransport, ProtocolError, SerialFrameError, Timing};

fn reply(function_code: u8, data: [u8; 3]) -> Vec<u8> {
    SerialFrame::new(0x01, function_code, data).to_bytes().to_vec()
}

#[test]
fn status_reports_alarm_and_temperature() {
    let mut mock = MockTransport::new();
    mock.push_raw(reply(0x05, [0x02, 0x01, 0xF4]));
    let mut driver = CurrentDriver::new(mock, 0x01, Timing::immediate());

    let status = driver.get_device_status().unwrap();
    assert_eq!(status.alarm, DriverAlarm::OverCurrent);
    assert!((status.temperature_c - 50.0).abs() < 1e-4);

    let request = &driver.transport().writes()[0];
    assert_eq!(
        request.as_slice(),
        &[0x55, 0xAA, 0x01, 0x05, 0x01, 0x00, 0x00, 0x06, 0xDA, 0xC3]
    );
}

#[test]
fn corrupted_checksum_is_rejected() {
    let mut bytes = reply(0x03, [0x07, 0xD0, 0x00]);
    bytes[7] ^= 0xFF;
    let mut mock = MockTransport::new();
    mock.push_raw(bytes);
    let mut driver = CurrentDriver::new(mock, 0x01, Timing::immediate());

    let err = driver.set_output_current(2000).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::InvalidResponse(SerialFrameError::ChecksumMismatch { .. })
    ));
}

#[test]
fn silent_line_is_a_transport_error() {
    let mut driver = CurrentDriver::new(MockTransport::new(), 0x01, Timing::immediate());
    let err = driver.clear_fault().unwrap_err();
    assert!(matches!(err, ProtocolError::Transport(_)));
}

#[test]
fn driver_on_other_address() {
    let mut mock = MockTransport::new();
    mock.push_raw(
        SerialFrame::new(0x07, 0x06, [0x01, 0x00, 0x00])
            .to_bytes()
            .to_vec(),
    );
    let mut driver = CurrentDriver::new(mock, 0x07, Timing::immediate());
    driver.clear_fault().unwrap();
    assert_eq!(driver.transport().writes()[0][2], 0x07);
}
