//! Device handle: serialized calls and inbound frame routing.
//!
//! ## Call sequence
//!
//! 1. fail with [`CallError::NotAttached`] if there is no connection (no I/O);
//! 2. take the per-device write lock;
//! 3. build the request frame and, if the function has outputs, record the
//!    expected response (function id + frame length);
//! 4. write the frame;
//! 5. wait up to the response timeout for the matching frame and unmarshal it;
//! 6. release the lock (on every path, by guard drop).
//!
//! There is no sequence number in the header. Responses are correlated purely
//! by "one request in flight per device", which the write lock enforces.
//! Multiplexing calls would need a per-request token in the header.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use packetgen_schema::Device;
use packetgen_wire::{DeviceLayout, FrameHeader, PacketLayout, WireValue, WireError};
use parking_lot::{Mutex, RwLock};

use crate::callback::{CallbackHandler, CallbackId, CallbackTable};
use crate::error::{CallError, CallResult};
use crate::transport::{AttachInfo, Transport};

/// Default bound on waiting for a response.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(2500);

/// Runtime tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// How long a call waits for its response.
    pub response_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

/// Versions reported by [`DeviceHandle::get_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Name reported by the device at attach time.
    pub name: String,
    /// Firmware version reported at attach time.
    pub firmware_version: [u8; 3],
    /// Version of the binding schema.
    pub binding_version: [u8; 3],
}

/// Where [`DeviceHandle::route_inbound`] sent a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Satisfied the pending call's wait.
    Response {
        /// Bytes consumed.
        consumed: usize,
    },
    /// Unmarshalled as a callback.
    Callback {
        /// Bytes consumed.
        consumed: usize,
        /// Whether a handler ran.
        delivered: bool,
    },
    /// Neither; dropped.
    Discarded {
        /// Bytes consumed.
        consumed: usize,
    },
}

impl Routed {
    /// Bytes the framing loop should skip.
    pub fn consumed(&self) -> usize {
        match *self {
            Routed::Response { consumed }
            | Routed::Callback { consumed, .. }
            | Routed::Discarded { consumed } => consumed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Expectation {
    function_id: u8,
    length: u16,
}

struct Connection {
    transport: Arc<dyn Transport>,
    stack_id: u8,
}

/// A device as seen by the host.
pub struct DeviceHandle {
    layout: Arc<DeviceLayout>,
    expected_name: String,
    binding_version: [u8; 3],
    config: RuntimeConfig,
    connection: RwLock<Option<Connection>>,
    identity: Mutex<(String, [u8; 3])>,
    write_lock: Mutex<()>,
    pending: Mutex<Option<Expectation>>,
    response_tx: Sender<Vec<u8>>,
    response_rx: Receiver<Vec<u8>>,
    callbacks: RwLock<CallbackTable>,
}

impl DeviceHandle {
    /// Create a detached handle for `device`.
    pub fn new(device: &Device, config: RuntimeConfig) -> Result<Self, WireError> {
        let layout = Arc::new(DeviceLayout::resolve(device)?);
        Ok(Self::with_layout(
            layout,
            device.expected_name(),
            device.version(),
            config,
        ))
    }

    /// Create a detached handle from an already resolved layout.
    pub fn with_layout(
        layout: Arc<DeviceLayout>,
        expected_name: String,
        binding_version: [u8; 3],
        config: RuntimeConfig,
    ) -> Self {
        let (response_tx, response_rx) = crossbeam_channel::bounded(1);
        let callbacks = RwLock::new(CallbackTable::new(&layout));
        DeviceHandle {
            layout,
            expected_name,
            binding_version,
            config,
            connection: RwLock::new(None),
            identity: Mutex::new((String::new(), [0; 3])),
            write_lock: Mutex::new(()),
            pending: Mutex::new(None),
            response_tx,
            response_rx,
            callbacks,
        }
    }

    /// Resolved layout of the device.
    pub fn layout(&self) -> &DeviceLayout {
        &self.layout
    }

    /// Name the connected device is expected to report.
    pub fn expected_name(&self) -> &str {
        &self.expected_name
    }

    /// Attach to a connection, caching what the device reported.
    pub fn attach(&self, transport: Arc<dyn Transport>, info: AttachInfo) {
        if !info.reported_name.starts_with(&self.expected_name) {
            tracing::warn!(
                expected = %self.expected_name,
                reported = %info.reported_name,
                "device reported an unexpected name"
            );
        }
        *self.identity.lock() = (info.reported_name, info.firmware_version);
        *self.connection.write() = Some(Connection {
            transport,
            stack_id: info.stack_id,
        });
        tracing::debug!(device = %self.layout.device, stack_id = info.stack_id, "attached");
    }

    /// Drop the connection. Later calls fail with [`CallError::NotAttached`].
    pub fn detach(&self) {
        *self.connection.write() = None;
    }

    /// Whether a connection is attached.
    pub fn is_attached(&self) -> bool {
        self.connection.read().is_some()
    }

    /// Call the function packet named `function` with one value per `in` element.
    ///
    /// Returns one value per `out` element; empty for functions without a
    /// response.
    pub fn call(&self, function: &str, inputs: &[WireValue]) -> CallResult<Vec<WireValue>> {
        let packet = self
            .layout
            .packet_by_name(function)
            .filter(|p| !p.is_callback())
            .ok_or_else(|| CallError::UnknownFunction(function.to_string()))?;

        let (transport, stack_id) = {
            let connection = self.connection.read();
            let connection = connection.as_ref().ok_or(CallError::NotAttached)?;
            (connection.transport.clone(), connection.stack_id)
        };

        let _guard = self.write_lock.lock();
        self.exchange(packet, transport.as_ref(), stack_id, inputs)
    }

    fn exchange(
        &self,
        packet: &PacketLayout,
        transport: &dyn Transport,
        stack_id: u8,
        inputs: &[WireValue],
    ) -> CallResult<Vec<WireValue>> {
        let request = packet
            .request()
            .ok_or_else(|| CallError::UnknownFunction(packet.name.clone()))?;
        let frame = request.encode(stack_id, inputs)?;
        let response = packet.response();

        if let Some(response) = response {
            while self.response_rx.try_recv().is_ok() {
                tracing::trace!("discarding stale response");
            }
            *self.pending.lock() = Some(Expectation {
                function_id: response.function_id,
                length: response.frame_size() as u16,
            });
        }

        tracing::debug!(function = %packet.name, bytes = frame.len(), "sending request");
        if let Err(status) = transport.write(&frame) {
            self.pending.lock().take();
            return Err(CallError::Transport(status));
        }

        let Some(response) = response else {
            return Ok(Vec::new());
        };

        match self.response_rx.recv_timeout(self.config.response_timeout) {
            Ok(bytes) => Ok(response.decode(&bytes)?),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.pending.lock().take();
                tracing::warn!(
                    function = %packet.name,
                    timeout = ?self.config.response_timeout,
                    "no response"
                );
                Err(CallError::Timeout {
                    function: packet.name.clone(),
                    timeout: self.config.response_timeout,
                })
            }
        }
    }

    /// Name and versions cached at attach time; no wire round trip.
    pub fn get_version(&self) -> VersionInfo {
        let identity = self.identity.lock();
        VersionInfo {
            name: identity.0.clone(),
            firmware_version: identity.1,
            binding_version: self.binding_version,
        }
    }

    /// Id of the callback packet named `name`.
    pub fn callback_id(&self, name: &str) -> Option<CallbackId> {
        self.callbacks.read().id(name)
    }

    /// Register `handler` for `id`, replacing any previous handler.
    pub fn register_callback<F>(&self, id: CallbackId, handler: F)
    where
        F: Fn(&[WireValue]) + Send + Sync + 'static,
    {
        let handler: CallbackHandler = Arc::new(handler);
        self.callbacks.write().register(id, Some(handler));
    }

    /// Clear the handler for `id`.
    pub fn clear_callback(&self, id: CallbackId) {
        self.callbacks.write().register(id, None);
    }

    /// Route one whole inbound frame.
    ///
    /// A frame is handed to the waiting call if its function id and length
    /// match the pending expectation; otherwise it is dispatched as a
    /// callback, or discarded. Never both.
    pub fn route_inbound(&self, frame: &[u8]) -> Routed {
        let header = match FrameHeader::decode(frame) {
            Ok(header) => header,
            Err(err) => {
                tracing::warn!(error = %err, "discarding undecodable frame");
                return Routed::Discarded {
                    consumed: frame.len(),
                };
            }
        };

        {
            let mut pending = self.pending.lock();
            let matches = pending.is_some_and(|e| {
                e.function_id == header.function_id && e.length == header.length
            });
            if matches {
                pending.take();
                if self.response_tx.try_send(frame.to_vec()).is_err() {
                    tracing::warn!(
                        function_id = header.function_id,
                        "response slot full, dropping"
                    );
                }
                return Routed::Response {
                    consumed: header.length as usize,
                };
            }
        }

        let prepared = self.callbacks.read().prepare(frame);
        match prepared {
            Some(prepared) => {
                let dispatch = prepared.run();
                tracing::trace!(
                    function_id = header.function_id,
                    delivered = dispatch.delivered,
                    "callback frame"
                );
                Routed::Callback {
                    consumed: dispatch.consumed,
                    delivered: dispatch.delivered,
                }
            }
            None => {
                tracing::trace!(function_id = header.function_id, "discarding unsolicited frame");
                Routed::Discarded {
                    consumed: header.length as usize,
                }
            }
        }
    }
}
