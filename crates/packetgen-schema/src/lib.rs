//! # packetgen-schema
//!
//! Schema model for devices that speak a fixed-format binary frame protocol.
//!
//! A [`Device`] owns an ordered list of [`Packet`]s. Each packet is either a
//! *function* (host-initiated request with an optional response) or a
//! *callback* (device-initiated event) and carries an ordered list of
//! [`Element`]s. Element order is wire order.
//!
//! Function ids are unique across functions and callbacks of one device since
//! both travel in the same frame header field.
//!
//! ## Example
//!
//! ```no_run
//! use packetgen_schema::load_device;
//!
//! let device = load_device("devices/distance_ir.yaml")?;
//! for packet in device.functions() {
//!     println!("{} -> {}", packet.function_id(), packet.name());
//! }
//! # Ok::<(), packetgen_schema::SchemaError>(())
//! ```

mod config;
mod device;
mod error;
pub mod naming;
mod types;

pub use config::{
    load_device, load_device_from_str, DeviceConfig, DocConfig, ElementConfig, ElementMap,
    PacketConfig,
};
pub use device::{Device, DeviceInfo, Documentation, Element, Packet, DEFAULT_LANGUAGE};
pub use error::{Result, SchemaError};
pub use types::{Direction, DocCategory, PacketKind, ScalarType};
