//! Frame layouts for requests, responses and callbacks.
//!
//! | Frame    | Body                                                  |
//! |----------|-------------------------------------------------------|
//! | request  | every `in` element of a function, declaration order   |
//! | response | every `out` element of a function, declaration order  |
//! | callback | every element of a callback, declaration order        |
//!
//! A function with no `out` elements has no response layout at all.

use packetgen_schema::{Device, Direction, Element, Packet, PacketKind};
use serde::Serialize;

use crate::header::HEADER_SIZE;
use crate::resolve::{resolve, ElementLayout};
use crate::{Result, WireError};

/// Which frame of a packet a layout describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// Host to device, function call.
    Request,
    /// Device to host, answer to a request.
    Response,
    /// Device to host, unsolicited.
    Callback,
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameKind::Request => write!(f, "request"),
            FrameKind::Response => write!(f, "response"),
            FrameKind::Callback => write!(f, "callback"),
        }
    }
}

/// One element placed in a frame body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// Element name.
    pub name: String,
    /// Byte offset within the body (add [`HEADER_SIZE`] for the frame offset).
    pub offset: usize,
    /// Resolved wire shape.
    pub layout: ElementLayout,
}

impl Slot {
    /// Byte range of this slot within the body.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset.saturating_add(self.layout.size())
    }
}

/// Byte layout of one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameLayout {
    /// Function id written into the header.
    pub function_id: u8,
    /// Request, response or callback.
    pub kind: FrameKind,
    /// Slots in wire order.
    pub slots: Vec<Slot>,
    /// Body size in bytes.
    pub body_size: usize,
}

impl FrameLayout {
    /// Lay out `elements` back to back.
    pub fn new<'a>(
        function_id: u8,
        kind: FrameKind,
        elements: impl IntoIterator<Item = &'a Element>,
    ) -> Self {
        let mut slots = Vec::new();
        let mut offset = 0;
        for element in elements {
            let layout = resolve(element);
            slots.push(Slot {
                name: element.name().to_string(),
                offset,
                layout,
            });
            offset = offset.saturating_add(layout.size());
        }
        FrameLayout {
            function_id,
            kind,
            slots,
            body_size: offset,
        }
    }

    /// Total frame size, the value of the header length field.
    pub fn frame_size(&self) -> usize {
        HEADER_SIZE.saturating_add(self.body_size)
    }

    /// Look up a slot by element name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }
}

/// Frames belonging to one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PacketFrames {
    /// Host-initiated exchange.
    Function {
        /// Request frame.
        request: FrameLayout,
        /// Response frame, absent for fire-and-forget functions.
        response: Option<FrameLayout>,
    },
    /// Device-initiated event.
    Callback {
        /// Callback frame.
        frame: FrameLayout,
    },
}

/// Resolved layouts of one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketLayout {
    /// Packet name.
    pub name: String,
    /// Function id.
    pub function_id: u8,
    /// Frame layouts.
    pub frames: PacketFrames,
}

impl PacketLayout {
    /// Resolve every frame of `packet`.
    pub fn resolve(packet: &Packet) -> Result<Self> {
        let id = packet.function_id();
        let frames = match packet.kind() {
            PacketKind::Function => {
                let request =
                    FrameLayout::new(id, FrameKind::Request, packet.elements(Direction::In));
                let response = packet.has_response().then(|| {
                    FrameLayout::new(id, FrameKind::Response, packet.elements(Direction::Out))
                });
                PacketFrames::Function { request, response }
            }
            PacketKind::Callback => PacketFrames::Callback {
                frame: FrameLayout::new(id, FrameKind::Callback, packet.all_elements()),
            },
        };

        let layout = PacketLayout {
            name: packet.name().to_string(),
            function_id: id,
            frames,
        };
        for frame in layout.frames() {
            if frame.frame_size() > u16::MAX as usize {
                return Err(WireError::FrameTooLarge {
                    packet: layout.name.clone(),
                    size: frame.frame_size(),
                });
            }
        }

        tracing::trace!(
            packet = %layout.name,
            function_id = id,
            frames = layout.frames().count(),
            "resolved packet layout"
        );
        Ok(layout)
    }

    /// Request frame of a function packet.
    pub fn request(&self) -> Option<&FrameLayout> {
        match &self.frames {
            PacketFrames::Function { request, .. } => Some(request),
            PacketFrames::Callback { .. } => None,
        }
    }

    /// Response frame of a function packet that has outputs.
    pub fn response(&self) -> Option<&FrameLayout> {
        match &self.frames {
            PacketFrames::Function { response, .. } => response.as_ref(),
            PacketFrames::Callback { .. } => None,
        }
    }

    /// Frame of a callback packet.
    pub fn callback(&self) -> Option<&FrameLayout> {
        match &self.frames {
            PacketFrames::Callback { frame } => Some(frame),
            PacketFrames::Function { .. } => None,
        }
    }

    /// Whether this is a callback packet.
    pub fn is_callback(&self) -> bool {
        matches!(self.frames, PacketFrames::Callback { .. })
    }

    /// Every frame of the packet.
    pub fn frames(&self) -> impl Iterator<Item = &FrameLayout> {
        self.request()
            .into_iter()
            .chain(self.response())
            .chain(self.callback())
    }
}

/// Layouts of every packet of a device, resolved once per generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceLayout {
    /// Device name.
    pub device: String,
    /// Packet layouts in declaration order.
    pub packets: Vec<PacketLayout>,
}

impl DeviceLayout {
    /// Resolve all packets of `device`.
    pub fn resolve(device: &Device) -> Result<Self> {
        let packets = device
            .packets()
            .iter()
            .map(PacketLayout::resolve)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(device = %device.name(), packets = packets.len(), "resolved device layout");
        Ok(DeviceLayout {
            device: device.name().to_string(),
            packets,
        })
    }

    /// Look up a packet by function id.
    pub fn packet(&self, function_id: u8) -> Option<&PacketLayout> {
        self.packets.iter().find(|p| p.function_id == function_id)
    }

    /// Look up a packet by name.
    pub fn packet_by_name(&self, name: &str) -> Option<&PacketLayout> {
        self.packets.iter().find(|p| p.name == name)
    }

    /// Callback packets in declaration order.
    pub fn callbacks(&self) -> impl Iterator<Item = &PacketLayout> {
        self.packets.iter().filter(|p| p.is_callback())
    }
}
