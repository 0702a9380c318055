//! Typed callback table and dispatch.
//!
//! The table has exactly one slot per declared callback packet, keyed by
//! [`CallbackId`]. Ids can only be obtained from the table itself, so a
//! handler can never be registered against a function packet or an
//! undeclared id.

use std::collections::BTreeMap;
use std::sync::Arc;

use packetgen_wire::{DeviceLayout, FrameHeader, FrameLayout, WireValue};

/// Handler invoked with the unmarshalled callback values in declared order.
pub type CallbackHandler = Arc<dyn Fn(&[WireValue]) + Send + Sync>;

/// Identity of a declared callback packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u8);

impl CallbackId {
    /// Function id of the callback packet.
    pub fn function_id(&self) -> u8 {
        self.0
    }
}

struct CallbackSlot {
    name: String,
    layout: FrameLayout,
    handler: Option<CallbackHandler>,
}

/// Result of dispatching one callback frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Bytes of the frame consumed.
    pub consumed: usize,
    /// Whether a handler was invoked.
    pub delivered: bool,
}

/// Per-device callback slots.
pub struct CallbackTable {
    slots: BTreeMap<u8, CallbackSlot>,
}

impl CallbackTable {
    /// Create a table with every callback of `layout` unregistered.
    pub fn new(layout: &DeviceLayout) -> Self {
        let slots = layout
            .callbacks()
            .filter_map(|packet| {
                packet.callback().map(|frame| {
                    (
                        packet.function_id,
                        CallbackSlot {
                            name: packet.name.clone(),
                            layout: frame.clone(),
                            handler: None,
                        },
                    )
                })
            })
            .collect();
        CallbackTable { slots }
    }

    /// Id of the callback packet named `name`.
    pub fn id(&self, name: &str) -> Option<CallbackId> {
        self.slots
            .iter()
            .find(|(_, slot)| slot.name == name)
            .map(|(id, _)| CallbackId(*id))
    }

    /// Id of the callback packet with `function_id`.
    pub fn id_for(&self, function_id: u8) -> Option<CallbackId> {
        self.slots.contains_key(&function_id).then_some(CallbackId(function_id))
    }

    /// Set or clear the handler for `id`, replacing any previous handler.
    pub fn register(&mut self, id: CallbackId, handler: Option<CallbackHandler>) {
        match self.slots.get_mut(&id.0) {
            Some(slot) => {
                tracing::debug!(
                    callback = %slot.name,
                    registered = handler.is_some(),
                    "callback registration"
                );
                slot.handler = handler;
            }
            None => tracing::warn!(
                function_id = id.0,
                "callback id does not belong to this device, ignoring registration"
            ),
        }
    }

    /// Whether a handler is set for `id`.
    pub fn is_registered(&self, id: CallbackId) -> bool {
        self.slots
            .get(&id.0)
            .is_some_and(|slot| slot.handler.is_some())
    }

    /// Whether `function_id` belongs to a callback packet.
    pub fn is_callback(&self, function_id: u8) -> bool {
        self.slots.contains_key(&function_id)
    }

    /// Unmarshal a callback frame and look up its handler.
    ///
    /// Returns `None` if the frame's function id is not a callback. The
    /// handler is returned rather than invoked so the caller can run it
    /// without holding the table lock.
    pub fn prepare(&self, frame: &[u8]) -> Option<PreparedDispatch> {
        let header = FrameHeader::decode(frame).ok()?;
        let slot = self.slots.get(&header.function_id)?;
        let consumed = slot.layout.frame_size();

        let values = match slot.layout.decode(frame) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(
                    callback = %slot.name,
                    error = %err,
                    "dropping malformed callback frame"
                );
                return Some(PreparedDispatch {
                    consumed: header.length as usize,
                    call: None,
                });
            }
        };

        Some(PreparedDispatch {
            consumed,
            call: slot.handler.clone().map(|handler| (handler, values)),
        })
    }

    /// Unmarshal and deliver a callback frame in one step.
    pub fn dispatch(&self, frame: &[u8]) -> Option<Dispatch> {
        self.prepare(frame).map(PreparedDispatch::run)
    }
}

/// A decoded callback frame waiting to be delivered.
pub struct PreparedDispatch {
    consumed: usize,
    call: Option<(CallbackHandler, Vec<WireValue>)>,
}

impl PreparedDispatch {
    /// Invoke the handler, if one was registered.
    pub fn run(self) -> Dispatch {
        let delivered = match self.call {
            Some((handler, values)) => {
                handler(&values);
                true
            }
            None => false,
        };
        Dispatch {
            consumed: self.consumed,
            delivered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packetgen_schema::{Device, DeviceInfo, Direction, Element, Packet, ScalarType};
    use parking_lot::Mutex;

    fn layout() -> DeviceLayout {
        let device = Device::new(
            DeviceInfo {
                category: "Bricklet".to_string(),
                name: "Switch".to_string(),
                display_name: "Switch".to_string(),
                description: String::new(),
                version: [1, 0, 0],
            },
            vec![
                Packet::function(
                    1,
                    "GetState",
                    vec![Element::new("state", ScalarType::Bool, 1, Direction::Out)],
                ),
                Packet::callback(
                    8,
                    "StateChanged",
                    vec![
                        Element::new("state", ScalarType::Bool, 1, Direction::Out),
                        Element::new("count", ScalarType::Uint16, 1, Direction::Out),
                    ],
                ),
            ],
        )
        .expect("valid device");
        DeviceLayout::resolve(&device).expect("resolves")
    }

    #[test]
    fn test_only_callbacks_have_ids() {
        let table = CallbackTable::new(&layout());
        assert!(table.id("StateChanged").is_some());
        assert!(table.id("GetState").is_none());
        assert!(table.id_for(1).is_none());
        assert_eq!(table.id_for(8).map(|id| id.function_id()), Some(8));
    }

    #[test]
    fn test_unregistered_dispatch_consumes_frame() {
        let table = CallbackTable::new(&layout());
        let frame = [0, 8, 7, 0, 1, 5, 0];
        assert_eq!(
            table.dispatch(&frame),
            Some(Dispatch {
                consumed: 7,
                delivered: false
            })
        );
        assert_eq!(table.dispatch(&[0, 1, 5, 0, 1]), None);
    }

    #[test]
    fn test_register_overwrites_and_clears() {
        let mut table = CallbackTable::new(&layout());
        let id = table.id("StateChanged").expect("id");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        table.register(id, Some(Arc::new(move |_: &[WireValue]| first.lock().push("first"))));
        let second = seen.clone();
        table.register(id, Some(Arc::new(move |_: &[WireValue]| second.lock().push("second"))));
        assert!(table.is_registered(id));

        let frame = [0, 8, 7, 0, 0, 1, 0];
        assert_eq!(table.dispatch(&frame).map(|d| d.delivered), Some(true));
        assert_eq!(*seen.lock(), vec!["second"]);

        table.register(id, None);
        assert!(!table.is_registered(id));
        assert_eq!(table.dispatch(&frame).map(|d| d.delivered), Some(false));
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_malformed_callback_frame_is_dropped() {
        let mut table = CallbackTable::new(&layout());
        let id = table.id("StateChanged").expect("id");
        table.register(id, Some(Arc::new(|_: &[WireValue]| panic!("must not be called"))));
        let frame = [0, 8, 6, 0, 1, 5];
        assert_eq!(
            table.dispatch(&frame),
            Some(Dispatch {
                consumed: 6,
                delivered: false
            })
        );
    }
}
