//! Inbound routing: responses versus callbacks versus unsolicited frames.

use std::sync::Arc;

use packetgen_runtime::{AttachInfo, DeviceHandle, Routed, RuntimeConfig, Transport};
use packetgen_schema::load_device_from_str;
use packetgen_wire::{Status, WireValue};
use parking_lot::Mutex;

const SCHEMA: &str = r#"
category: Bricklet
name: Motion
version: [1, 0, 0]
packets:
  - type: function
    function_id: 1
    name: GetAxes
    elements:
      - [axes, int16, 3, out]
  - type: callback
    function_id: 12
    name: Axes
    elements:
      - [axes, uint16, 3]
      - [moving, bool, 1]
      - [label, string, 4]
  - type: callback
    function_id: 13
    name: Tap
    elements:
      - [strength, uint8, 1]
"#;

struct NullTransport;

impl Transport for NullTransport {
    fn write(&self, _frame: &[u8]) -> Result<(), Status> {
        Ok(())
    }
}

fn device() -> DeviceHandle {
    let device = load_device_from_str(SCHEMA).expect("schema loads");
    let handle = DeviceHandle::new(&device, RuntimeConfig::default()).expect("resolves");
    handle.attach(
        Arc::new(NullTransport),
        AttachInfo {
            stack_id: 1,
            reported_name: "Motion Bricklet".to_string(),
            firmware_version: [1, 0, 0],
        },
    );
    handle
}

#[test]
fn test_unregistered_callback_is_consumed_silently() {
    let device = device();
    let frame = [1, 13, 5, 0, 9];
    assert_eq!(
        device.route_inbound(&frame),
        Routed::Callback {
            consumed: 5,
            delivered: false
        }
    );
}

#[test]
fn test_registered_callback_receives_values_in_order() {
    let device = device();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let id = device.callback_id("Axes").expect("declared callback");
    let sink = seen.clone();
    device.register_callback(id, move |values: &[WireValue]| sink.lock().push(values.to_vec()));

    let mut frame = vec![1, 12, 15, 0];
    frame.extend_from_slice(&[0x01, 0x00, 0x02, 0x00, 0x03, 0x00]);
    frame.push(1);
    frame.extend_from_slice(b"ab\0\0");

    let routed = device.route_inbound(&frame);
    assert_eq!(routed.consumed(), 15);
    assert_eq!(
        routed,
        Routed::Callback {
            consumed: 15,
            delivered: true
        }
    );

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0],
        vec![
            WireValue::from(vec![1u16, 2, 3]),
            WireValue::Bool(true),
            WireValue::String(b"ab\0\0".to_vec()),
        ]
    );
}

#[test]
fn test_clearing_a_callback() {
    let device = device();
    let hits = Arc::new(Mutex::new(0));
    let id = device.callback_id("Tap").expect("declared callback");
    let counter = hits.clone();
    device.register_callback(id, move |_: &[WireValue]| *counter.lock() += 1);

    device.route_inbound(&[1, 13, 5, 0, 9]);
    device.clear_callback(id);
    device.route_inbound(&[1, 13, 5, 0, 9]);
    assert_eq!(*hits.lock(), 1);
}

#[test]
fn test_functions_have_no_callback_id() {
    let device = device();
    assert!(device.callback_id("GetAxes").is_none());
    assert!(device.callback_id("Tap").is_some());
}

#[test]
fn test_unsolicited_response_is_discarded() {
    let device = device();
    let frame = [1, 1, 10, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(device.route_inbound(&frame), Routed::Discarded { consumed: 10 });
    assert_eq!(device.route_inbound(&[1, 2]), Routed::Discarded { consumed: 2 });
}
