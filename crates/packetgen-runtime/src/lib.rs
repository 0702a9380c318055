//! # packetgen-runtime
//!
//! An executable model of the contract generated bindings follow, used to
//! exercise resolved layouts end to end.
//!
//! - [`DeviceHandle::call`] serializes calls per device with a write lock and
//!   waits for the response with a timeout.
//! - [`DeviceHandle::route_inbound`] sends each inbound frame either to the
//!   waiting call or to the [`CallbackTable`].
//! - [`Transport`] is the seam to the connection layer.
//!
//! ```rust,ignore
//! let handle = DeviceHandle::new(&device, RuntimeConfig::default())?;
//! handle.attach(transport, AttachInfo { stack_id: 1, reported_name, firmware_version });
//! let outputs = handle.call("GetDistance", &[])?;
//! ```

mod callback;
mod device;
mod error;
mod transport;

pub use callback::{CallbackHandler, CallbackId, CallbackTable, Dispatch, PreparedDispatch};
pub use device::{DeviceHandle, Routed, RuntimeConfig, VersionInfo, DEFAULT_RESPONSE_TIMEOUT};
pub use error::{CallError, CallResult};
pub use transport::{AttachInfo, Transport};
