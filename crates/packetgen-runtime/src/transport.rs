//! Connection layer seam.

use packetgen_wire::Status;

/// The connection a device handle writes frames to.
///
/// Inbound frames travel the other way: the connection's read loop hands each
/// whole frame to [`DeviceHandle::route_inbound`](crate::DeviceHandle::route_inbound),
/// in wire order.
pub trait Transport: Send + Sync {
    /// Send one complete frame.
    ///
    /// A failure status is returned to the caller of the generated function
    /// unchanged.
    fn write(&self, frame: &[u8]) -> Result<(), Status>;
}

/// What a connection learned about the device when it attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachInfo {
    /// Stack id written into every request header.
    pub stack_id: u8,
    /// Name the device reported, including hardware version.
    pub reported_name: String,
    /// Firmware version the device reported.
    pub firmware_version: [u8; 3],
}
