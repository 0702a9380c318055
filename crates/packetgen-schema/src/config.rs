//! YAML device configuration loading.
//!
//! ## Format
//!
//! ```yaml
//! category: Bricklet
//! name: Distance
//! display_name: Distance IR
//! description: Measures distance up to 150cm with infrared light
//! version: [1, 0, 0]
//! packets:
//!   - type: function
//!     function_id: 1
//!     name: GetDistance
//!     elements:
//!       - [distance, uint16, 1, out]
//!     doc:
//!       category: basic
//!       text:
//!         en: Returns the distance measured by the sensor.
//!   - type: callback
//!     function_id: 15
//!     name: Distance
//!     elements:
//!       - { name: distance, type: uint16 }
//! ```
//!
//! Type and direction spellings are validated here rather than by serde so a
//! bad spelling is reported with the packet and element it belongs to.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceInfo, Documentation, Element, Packet};
use crate::types::{Direction, DocCategory, PacketKind, ScalarType};
use crate::{Result, SchemaError};

// ============================================================================
// Raw configuration types
// ============================================================================

/// Root of a device configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Coarse device class.
    pub category: String,
    /// CamelCase device name.
    pub name: String,
    /// Human-facing name; defaults to `name`.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Description paragraph.
    #[serde(default)]
    pub description: String,
    /// Binding version `[major, minor, revision]`.
    pub version: [u8; 3],
    /// Packets in declaration order.
    #[serde(default)]
    pub packets: Vec<PacketConfig>,
}

/// One packet entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PacketConfig {
    /// `function` or `callback`.
    #[serde(rename = "type")]
    pub kind: PacketKind,
    /// Device-scoped id; range checked on conversion.
    pub function_id: u32,
    /// CamelCase packet name.
    pub name: String,
    /// Elements in wire order.
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    /// Optional documentation block.
    #[serde(default)]
    pub doc: DocConfig,
}

/// An element, either as a `[name, type, count, direction]` tuple or a mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementConfig {
    /// `[name, type, count, direction]`
    Full(String, String, usize, String),
    /// `[name, type, count]`, direction implied (callbacks only).
    Short(String, String, usize),
    /// `{ name, type, count, direction }`
    Map(ElementMap),
}

/// Mapping form of an element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementMap {
    /// Element name.
    pub name: String,
    /// Type spelling.
    #[serde(rename = "type")]
    pub ty: String,
    /// Count, default 1.
    #[serde(default = "default_count")]
    pub count: usize,
    /// `in` or `out`.
    #[serde(default)]
    pub direction: Option<String>,
}

fn default_count() -> usize {
    1
}

/// Documentation block of a packet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocConfig {
    /// Classification.
    #[serde(default)]
    pub category: DocCategory,
    /// Text per language.
    #[serde(default)]
    pub text: BTreeMap<String, String>,
}

impl ElementConfig {
    fn parts(&self) -> (&str, &str, usize, Option<&str>) {
        match self {
            ElementConfig::Full(name, ty, count, dir) => (name, ty, *count, Some(dir.as_str())),
            ElementConfig::Short(name, ty, count) => (name, ty, *count, None),
            ElementConfig::Map(m) => (&m.name, &m.ty, m.count, m.direction.as_deref()),
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

impl DeviceConfig {
    /// Convert into a validated [`Device`].
    pub fn into_device(self) -> Result<Device> {
        let packets = self
            .packets
            .iter()
            .map(PacketConfig::to_packet)
            .collect::<Result<Vec<_>>>()?;

        let info = DeviceInfo {
            display_name: self.display_name.unwrap_or_else(|| self.name.clone()),
            category: self.category,
            name: self.name,
            description: self.description,
            version: self.version,
        };
        Device::new(info, packets)
    }
}

impl PacketConfig {
    fn to_packet(&self) -> Result<Packet> {
        let function_id = u8::try_from(self.function_id)
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| SchemaError::FunctionIdOutOfRange {
                packet: self.name.clone(),
                id: self.function_id,
            })?;

        let elements = self
            .elements
            .iter()
            .map(|e| self.to_element(e))
            .collect::<Result<Vec<_>>>()?;

        let doc = Documentation {
            category: self.doc.category,
            text: self.doc.text.clone(),
        };
        Ok(Packet::new(self.kind, function_id, self.name.clone(), elements, doc))
    }

    fn to_element(&self, config: &ElementConfig) -> Result<Element> {
        let (name, type_name, count, direction) = config.parts();

        let ty = ScalarType::parse(type_name).ok_or_else(|| SchemaError::UnknownType {
            packet: self.name.clone(),
            element: name.to_string(),
            type_name: type_name.to_string(),
        })?;

        let direction = match (direction, self.kind) {
            (Some(d), _) => Direction::parse(d).ok_or_else(|| SchemaError::InvalidDirection {
                packet: self.name.clone(),
                element: name.to_string(),
                direction: d.to_string(),
            })?,
            (None, PacketKind::Callback) => Direction::Out,
            (None, PacketKind::Function) => {
                return Err(SchemaError::MissingDirection {
                    packet: self.name.clone(),
                    element: name.to_string(),
                })
            }
        };

        Ok(Element::new(name, ty, count, direction))
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a device from a YAML file.
pub fn load_device(path: impl AsRef<Path>) -> Result<Device> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading device configuration");
    let content = std::fs::read_to_string(path)?;
    load_device_from_str(&content)
}

/// Load and validate a device from YAML text.
pub fn load_device_from_str(yaml: &str) -> Result<Device> {
    let config: DeviceConfig = serde_yaml::from_str(yaml)?;
    config.into_device()
}
