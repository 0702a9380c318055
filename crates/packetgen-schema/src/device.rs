//! In-memory schema model: [`Device`], [`Packet`] and [`Element`].
//!
//! A [`Device`] can only be obtained through [`Device::new`] (or the YAML
//! loader, which calls it), so every device in circulation has passed
//! validation. Nothing is mutable after construction.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::naming;
use crate::types::{Direction, DocCategory, PacketKind, ScalarType};
use crate::{Result, SchemaError};

/// Language used when a requested documentation language is missing.
pub const DEFAULT_LANGUAGE: &str = "en";

// ============================================================================
// Element
// ============================================================================

/// One typed field inside a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    ty: ScalarType,
    count: usize,
    direction: Direction,
}

impl Element {
    /// Create an element.
    pub fn new(
        name: impl Into<String>,
        ty: ScalarType,
        count: usize,
        direction: Direction,
    ) -> Self {
        Element {
            name: name.into(),
            ty,
            count,
            direction,
        }
    }

    /// Element name (snake_case, used verbatim in generated code).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared scalar type.
    pub fn ty(&self) -> ScalarType {
        self.ty
    }

    /// Repetition count; string capacity for strings.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Direction relative to the host.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether this element is a fixed-size array (strings are not arrays).
    pub fn is_array(&self) -> bool {
        self.count > 1 && self.ty != ScalarType::String
    }
}

// ============================================================================
// Documentation
// ============================================================================

/// Localized packet documentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
    /// Classification used for ordering in references.
    pub category: DocCategory,
    /// Text per language code.
    pub text: BTreeMap<String, String>,
}

impl Documentation {
    /// Text for `lang`, falling back to English, then to the empty string.
    pub fn text_for(&self, lang: &str) -> &str {
        self.text
            .get(lang)
            .or_else(|| self.text.get(DEFAULT_LANGUAGE))
            .map(String::as_str)
            .unwrap_or("")
    }
}

// ============================================================================
// Packet
// ============================================================================

/// One protocol message shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    kind: PacketKind,
    function_id: u8,
    name: String,
    elements: Vec<Element>,
    doc: Documentation,
}

impl Packet {
    /// Create a packet of the given kind.
    pub fn new(
        kind: PacketKind,
        function_id: u8,
        name: impl Into<String>,
        elements: Vec<Element>,
        doc: Documentation,
    ) -> Self {
        Packet {
            kind,
            function_id,
            name: name.into(),
            elements,
            doc,
        }
    }

    /// Create a function packet with default documentation.
    pub fn function(function_id: u8, name: impl Into<String>, elements: Vec<Element>) -> Self {
        Packet::new(PacketKind::Function, function_id, name, elements, Documentation::default())
    }

    /// Create a callback packet with default documentation.
    pub fn callback(function_id: u8, name: impl Into<String>, elements: Vec<Element>) -> Self {
        Packet::new(PacketKind::Callback, function_id, name, elements, Documentation::default())
    }

    /// Function or callback.
    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    /// Device-scoped function id.
    pub fn function_id(&self) -> u8 {
        self.function_id
    }

    /// CamelCase name as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// snake_case form of the name.
    pub fn underscore_name(&self) -> String {
        naming::snake_case(&self.name)
    }

    /// UPPER_CASE form of the name.
    pub fn upper_case_name(&self) -> String {
        naming::upper_case(&self.name)
    }

    /// All elements in wire order.
    pub fn all_elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements travelling in `direction`, in wire order.
    ///
    /// Every callback element is device-to-host, so `Direction::Out` on a
    /// callback yields all of its elements.
    pub fn elements(&self, direction: Direction) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |e| e.direction == direction)
    }

    /// Whether a function packet produces a response frame.
    pub fn has_response(&self) -> bool {
        self.kind == PacketKind::Function && self.elements(Direction::Out).next().is_some()
    }

    /// Packet documentation.
    pub fn doc(&self) -> &Documentation {
        &self.doc
    }
}

// ============================================================================
// Device
// ============================================================================

/// Identity and descriptive attributes of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Coarse device class (e.g. "Bricklet").
    pub category: String,
    /// CamelCase device name.
    pub name: String,
    /// Name shown to humans.
    pub display_name: String,
    /// One-paragraph description.
    pub description: String,
    /// Binding version `[major, minor, revision]`.
    pub version: [u8; 3],
}

/// One protocol-speaking entity and its packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    info: DeviceInfo,
    packets: Vec<Packet>,
}

impl Device {
    /// Build a device, validating every schema invariant.
    pub fn new(info: DeviceInfo, packets: Vec<Packet>) -> Result<Self> {
        if info.name.trim().is_empty() {
            return Err(SchemaError::MissingField("device name".to_string()));
        }
        if info.category.trim().is_empty() {
            return Err(SchemaError::MissingField("device category".to_string()));
        }

        let device_var = naming::snake_case(&info.name);
        let mut ids: HashMap<u8, &str> = HashMap::new();
        let mut names: HashSet<&str> = HashSet::new();

        for packet in &packets {
            if packet.name.trim().is_empty() {
                return Err(SchemaError::MissingField(format!(
                    "name of packet with function id {}",
                    packet.function_id
                )));
            }
            if packet.function_id == 0 {
                return Err(SchemaError::FunctionIdOutOfRange {
                    packet: packet.name.clone(),
                    id: 0,
                });
            }
            if let Some(first) = ids.insert(packet.function_id, &packet.name) {
                return Err(SchemaError::DuplicateFunctionId {
                    id: packet.function_id,
                    first: first.to_string(),
                    second: packet.name.clone(),
                });
            }
            if !names.insert(&packet.name) {
                return Err(SchemaError::DuplicatePacketName(packet.name.clone()));
            }
            validate_elements(packet, &device_var)?;
        }

        tracing::debug!(
            device = %info.name,
            packets = packets.len(),
            "validated device schema"
        );

        Ok(Device { info, packets })
    }

    /// Descriptive attributes.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Coarse device class.
    pub fn category(&self) -> &str {
        &self.info.category
    }

    /// CamelCase device name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// snake_case device name.
    pub fn underscore_name(&self) -> String {
        naming::snake_case(&self.info.name)
    }

    /// UPPER_CASE device name.
    pub fn upper_case_name(&self) -> String {
        naming::upper_case(&self.info.name)
    }

    /// Display name.
    pub fn display_name(&self) -> &str {
        &self.info.display_name
    }

    /// Description.
    pub fn description(&self) -> &str {
        &self.info.description
    }

    /// Binding version triple.
    pub fn version(&self) -> [u8; 3] {
        self.info.version
    }

    /// The name a connected device is expected to report.
    pub fn expected_name(&self) -> String {
        format!("{} {}", self.info.display_name, self.info.category)
    }

    /// All packets in declaration order.
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Function packets in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &Packet> {
        self.packets
            .iter()
            .filter(|p| p.kind == PacketKind::Function)
    }

    /// Callback packets in declaration order.
    pub fn callbacks(&self) -> impl Iterator<Item = &Packet> {
        self.packets
            .iter()
            .filter(|p| p.kind == PacketKind::Callback)
    }

    /// Number of callback packets.
    pub fn callback_count(&self) -> usize {
        self.callbacks().count()
    }

    /// Look up a packet by function id.
    pub fn packet(&self, function_id: u8) -> Option<&Packet> {
        self.packets.iter().find(|p| p.function_id == function_id)
    }

    /// Look up a packet by its configured name.
    pub fn packet_by_name(&self, name: &str) -> Option<&Packet> {
        self.packets.iter().find(|p| p.name == name)
    }
}

/// Frame header members and the wrapper's read buffer, present in every
/// generated frame struct or callback wrapper.
const GENERATED_NAMES: &[&str] = &["stack_id", "function_id", "length", "buffer"];

fn validate_elements(packet: &Packet, device_var: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for element in &packet.elements {
        if element.name.trim().is_empty() {
            return Err(SchemaError::MissingField(format!(
                "element name in packet '{}'",
                packet.name
            )));
        }
        if let Some(reason) = name_conflict(packet, element, device_var) {
            return Err(SchemaError::InvalidElementName {
                packet: packet.name.clone(),
                element: element.name.clone(),
                reason,
            });
        }
        if !seen.insert(element.name.as_str()) {
            return Err(SchemaError::DuplicateElementName {
                packet: packet.name.clone(),
                element: element.name.clone(),
            });
        }
        if element.count == 0 {
            return Err(SchemaError::ZeroCount {
                packet: packet.name.clone(),
                element: element.name.clone(),
            });
        }
        if packet.kind == PacketKind::Callback && element.direction == Direction::In {
            return Err(SchemaError::CallbackInput {
                packet: packet.name.clone(),
                element: element.name.clone(),
            });
        }
    }
    Ok(())
}

fn name_conflict(packet: &Packet, element: &Element, device_var: &str) -> Option<String> {
    let name = element.name.as_str();
    if !naming::is_identifier(name) {
        return Some("is not a valid identifier".to_string());
    }
    if naming::is_reserved(name) {
        return Some("is a reserved word".to_string());
    }
    if GENERATED_NAMES.contains(&name) {
        return Some("is used by the generated frame code".to_string());
    }
    if name == device_var {
        return Some(format!("clashes with the device handle '{}'", device_var));
    }
    // Outputs become `ret_<name>` parameters next to the inputs.
    if packet.kind == PacketKind::Function {
        let shadowed = packet
            .elements(Direction::Out)
            .any(|out| format!("ret_{}", out.name) == name);
        if shadowed {
            return Some("clashes with the parameter of an output element".to_string());
        }
    }
    None
}
