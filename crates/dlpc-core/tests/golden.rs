use std::fs;
use std::path::Path;

use dlpc_core::{Dmd, MockTransport, Timing};
use serde_json::Value;

fn load_expected(dir: &str) -> Value {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    let expected_path = root.join(dir).join("expected_report.json");

    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn scripted_status_device() -> MockTransport {
    let mut mock = MockTransport::new();
    let mut identity = vec![0x01];
    identity.extend_from_slice(b"v4.3.0\0\0");
    mock.push_reply(&identity)
        .push_reply(&[
            0x02, 0x00, 0x03, 0x04, // application 4.3.2
            0x00, 0x00, 0x05, 0x01, // api 1.5.0
            0x01, 0x00, 0x00, 0x02, // software config 2.0.1
            0x00, 0x01, 0x02, 0x03, // sequencer config 3.2.256
        ])
        .push_reply(&[0x11])
        .push_reply(&[0x0B])
        .push_reply(&[0x00])
        .push_reply(&[0x00])
        .push_reply(&[0x01])
        .push_reply(&[0x00]);
    mock
}

#[test]
fn golden_status_report() {
    let mut dmd = Dmd::new(scripted_status_device(), Timing::immediate());
    let report = dmd.status_report().expect("status report");

    let actual = serde_json::to_value(&report).expect("serialize report");
    let expected = load_expected("tests/golden/status");
    assert_eq!(actual, expected, "golden mismatch in tests/golden/status");
    assert_eq!(dmd.transport().pending_reads(), 0);
}

#[test]
fn golden_status_report_queries_in_order() {
    let mut dmd = Dmd::new(scripted_status_device(), Timing::immediate());
    dmd.status_report().expect("status report");

    let commands: Vec<u16> = dmd
        .transport()
        .commands()
        .iter()
        .map(|frame| frame.command())
        .collect();
    assert_eq!(
        commands,
        vec![0x0206, 0x0205, 0x1A0A, 0x1A0C, 0x0201, 0x0200, 0x1A1B, 0x0100]
    );
}
