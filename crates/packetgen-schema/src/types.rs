//! Enumerations used by the schema model.
//!
//! - [`ScalarType`] - The declared type of an element
//! - [`Direction`] - Which way an element travels in a function exchange
//! - [`PacketKind`] - Function (host-initiated) or callback (device-initiated)
//! - [`DocCategory`] - Documentation classification of a packet

use serde::{Deserialize, Serialize};

// ============================================================================
// Scalar Type
// ============================================================================

/// The scalar type of an element.
///
/// `String` is a fixed-capacity byte buffer; the element count is its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    Uint64,
    /// IEEE-754 single precision float.
    Float,
    /// Boolean, one byte on the wire.
    Bool,
    /// Single character byte.
    Char,
    /// Fixed-length string.
    String,
}

impl ScalarType {
    /// All scalar types, in type-table order.
    pub const ALL: [ScalarType; 12] = [
        ScalarType::Int8,
        ScalarType::Uint8,
        ScalarType::Int16,
        ScalarType::Uint16,
        ScalarType::Int32,
        ScalarType::Uint32,
        ScalarType::Int64,
        ScalarType::Uint64,
        ScalarType::Float,
        ScalarType::Bool,
        ScalarType::Char,
        ScalarType::String,
    ];

    /// Parse a type spelling from a configuration file.
    pub fn parse(s: &str) -> Option<Self> {
        ScalarType::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// The configuration spelling of this type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Int8 => "int8",
            ScalarType::Uint8 => "uint8",
            ScalarType::Int16 => "int16",
            ScalarType::Uint16 => "uint16",
            ScalarType::Int32 => "int32",
            ScalarType::Uint32 => "uint32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint64 => "uint64",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
            ScalarType::Char => "char",
            ScalarType::String => "string",
        }
    }

    /// Whether this is one of the integer types.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::Int8
                | ScalarType::Uint8
                | ScalarType::Int16
                | ScalarType::Uint16
                | ScalarType::Int32
                | ScalarType::Uint32
                | ScalarType::Int64
                | ScalarType::Uint64
        )
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Direction of an element relative to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Host to device (request body).
    In,
    /// Device to host (response or callback body).
    Out,
}

impl Direction {
    /// Parse a direction spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

// ============================================================================
// Packet Kind
// ============================================================================

/// The kind of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacketKind {
    /// Host-initiated request with an optional response.
    Function,
    /// Device-initiated asynchronous event.
    Callback,
}

impl std::fmt::Display for PacketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketKind::Function => write!(f, "function"),
            PacketKind::Callback => write!(f, "callback"),
        }
    }
}

// ============================================================================
// Documentation Category
// ============================================================================

/// Documentation classification of a packet.
///
/// Affects the order packets are listed in generated references, never the
/// wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocCategory {
    /// Everyday functionality.
    #[default]
    Basic,
    /// Configuration and tuning.
    Advanced,
    /// Raw access, rarely needed.
    LowLevel,
}

impl DocCategory {
    /// Human-readable section title.
    pub const fn title(&self) -> &'static str {
        match self {
            DocCategory::Basic => "Basic Functions",
            DocCategory::Advanced => "Advanced Functions",
            DocCategory::LowLevel => "Low-Level Functions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_type_parse() {
        for ty in ScalarType::ALL {
            assert_eq!(ScalarType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ScalarType::parse("uint24"), None);
        assert_eq!(ScalarType::parse("Int8"), None);
        assert_eq!(ScalarType::parse("double"), None);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("in"), Some(Direction::In));
        assert_eq!(Direction::parse("out"), Some(Direction::Out));
        assert_eq!(Direction::parse("inout"), None);
    }

    #[test]
    fn test_doc_category_order() {
        assert!(DocCategory::Basic < DocCategory::Advanced);
        assert!(DocCategory::Advanced < DocCategory::LowLevel);
    }
}
