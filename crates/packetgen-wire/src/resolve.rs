//! Type & layout resolution for single elements.
//!
//! Packing is byte-tight: an array repeats its scalar width `count` times with
//! no padding, and strings are raw byte runs of exactly `count` bytes.

use packetgen_schema::{Element, ScalarType};
use serde::Serialize;

/// Wire width of one scalar of `ty`, in bytes.
pub const fn scalar_width(ty: ScalarType) -> usize {
    match ty {
        ScalarType::Int8
        | ScalarType::Uint8
        | ScalarType::Bool
        | ScalarType::Char
        | ScalarType::String => 1,
        ScalarType::Int16 | ScalarType::Uint16 => 2,
        ScalarType::Int32 | ScalarType::Uint32 | ScalarType::Float => 4,
        ScalarType::Int64 | ScalarType::Uint64 => 8,
    }
}

/// How an element is moved between host memory and its frame slot.
///
/// The variants are the five cases of the marshalling algorithm, checked in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transfer {
    /// Copy at most `count` bytes of a string.
    StringCopy,
    /// Byte-order convert each item of a multi-byte array.
    ArraySwap,
    /// Bulk copy an array of single-byte items.
    ArrayCopy,
    /// Byte-order convert one multi-byte scalar.
    ScalarSwap,
    /// Copy one single-byte scalar verbatim.
    ScalarCopy,
}

/// Resolved wire shape of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementLayout {
    /// Declared scalar type.
    pub wire_type: ScalarType,
    /// Width of one scalar on the wire.
    pub width_bytes: usize,
    /// Number of scalars (string capacity for strings).
    pub count: usize,
    /// Fixed-size array of a non-string type.
    pub is_array: bool,
    /// Multi-byte numeric value that must be converted to little-endian.
    pub needs_endian_swap: bool,
    /// Fixed-capacity byte string.
    pub is_string: bool,
}

impl ElementLayout {
    /// Total bytes the element occupies in a frame body.
    ///
    /// Saturates at `usize::MAX`, which no frame length field can hold.
    pub const fn size(&self) -> usize {
        self.width_bytes.saturating_mul(self.count)
    }

    /// Transfer rule for this element.
    pub const fn transfer(&self) -> Transfer {
        if self.is_string {
            Transfer::StringCopy
        } else if self.is_array && self.needs_endian_swap {
            Transfer::ArraySwap
        } else if self.is_array {
            Transfer::ArrayCopy
        } else if self.needs_endian_swap {
            Transfer::ScalarSwap
        } else {
            Transfer::ScalarCopy
        }
    }
}

/// Resolve an element's wire shape.
pub fn resolve(element: &Element) -> ElementLayout {
    resolve_type(element.ty(), element.count())
}

/// Resolve a `(type, count)` pair.
pub const fn resolve_type(ty: ScalarType, count: usize) -> ElementLayout {
    let width_bytes = scalar_width(ty);
    let is_string = matches!(ty, ScalarType::String);
    let needs_endian_swap = width_bytes > 1
        && !matches!(ty, ScalarType::String | ScalarType::Char | ScalarType::Bool);
    ElementLayout {
        wire_type: ty,
        width_bytes,
        count,
        is_array: count > 1 && !is_string,
        needs_endian_swap,
        is_string,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packetgen_schema::Direction;

    #[test]
    fn test_scalar_widths() {
        assert_eq!(scalar_width(ScalarType::Int8), 1);
        assert_eq!(scalar_width(ScalarType::Bool), 1);
        assert_eq!(scalar_width(ScalarType::Char), 1);
        assert_eq!(scalar_width(ScalarType::Uint16), 2);
        assert_eq!(scalar_width(ScalarType::Float), 4);
        assert_eq!(scalar_width(ScalarType::Int64), 8);
    }

    #[test]
    fn test_endian_swap_only_for_multibyte_numbers() {
        for ty in ScalarType::ALL {
            let layout = resolve_type(ty, 1);
            assert_eq!(
                layout.needs_endian_swap,
                scalar_width(ty) > 1,
                "unexpected swap flag for {}",
                ty
            );
        }
        assert!(!resolve_type(ScalarType::String, 32).needs_endian_swap);
    }

    #[test]
    fn test_resolve_array_and_string() {
        let array = resolve(&Element::new("values", ScalarType::Uint16, 3, Direction::Out));
        assert!(array.is_array);
        assert!(!array.is_string);
        assert_eq!(array.size(), 6);
        assert_eq!(array.transfer(), Transfer::ArraySwap);

        let bytes = resolve(&Element::new("data", ScalarType::Uint8, 8, Direction::In));
        assert_eq!(bytes.transfer(), Transfer::ArrayCopy);
        assert_eq!(bytes.size(), 8);

        let text = resolve(&Element::new("text", ScalarType::String, 20, Direction::In));
        assert!(text.is_string);
        assert!(!text.is_array);
        assert_eq!(text.size(), 20);
        assert_eq!(text.transfer(), Transfer::StringCopy);
    }

    #[test]
    fn test_resolve_scalars() {
        let value = resolve(&Element::new("value", ScalarType::Int32, 1, Direction::Out));
        assert_eq!(value.transfer(), Transfer::ScalarSwap);
        assert_eq!(value.size(), 4);

        let flag = resolve(&Element::new("enabled", ScalarType::Bool, 1, Direction::In));
        assert_eq!(flag.transfer(), Transfer::ScalarCopy);
    }
}
