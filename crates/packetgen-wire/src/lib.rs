//! # packetgen-wire
//!
//! Turns a schema into a byte-exact wire layout.
//!
//! - [`resolve`] maps an element to its width, array/string shape and whether
//!   it needs byte-order conversion.
//! - [`FrameLayout`] places elements back to back behind the 4-byte
//!   [`FrameHeader`]; [`PacketLayout`] and [`DeviceLayout`] resolve whole
//!   packets and devices.
//! - [`FrameLayout::encode`] and [`FrameLayout::decode`] are the reference
//!   marshalling rules that generated bindings implement.
//! - [`Status`] is the closed set of codes generated calls return.
//!
//! All multi-byte fields are little-endian on the wire.

mod codec;
mod error;
mod header;
mod layout;
mod resolve;
mod status;
mod value;

pub use error::{Result, WireError};
pub use header::{FrameHeader, HEADER_SIZE};
pub use layout::{DeviceLayout, FrameKind, FrameLayout, PacketFrames, PacketLayout, Slot};
pub use resolve::{resolve, resolve_type, scalar_width, ElementLayout, Transfer};
pub use status::Status;
pub use value::WireValue;
