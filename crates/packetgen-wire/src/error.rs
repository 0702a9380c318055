//! Wire error types.

use packetgen_schema::ScalarType;
use thiserror::Error;

/// Errors raised while resolving layouts or running the reference codec.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    /// A packet's frame does not fit the 16-bit length field.
    #[error("packet '{packet}': frame of {size} bytes exceeds the 16-bit length field")]
    FrameTooLarge {
        /// Packet name.
        packet: String,
        /// Computed frame size.
        size: usize,
    },

    /// Wrong number of values supplied for a frame.
    #[error("expected {expected} values, got {actual}")]
    ValueCount {
        /// Number of slots in the frame.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Value does not match the element's declared type.
    #[error("element '{element}': expected {expected}, got {found}")]
    TypeMismatch {
        /// Element name.
        element: String,
        /// Declared type.
        expected: ScalarType,
        /// Description of the supplied value.
        found: String,
    },

    /// Array value with the wrong number of items.
    #[error("element '{element}': expected {expected} items, got {actual}")]
    ArrayLength {
        /// Element name.
        element: String,
        /// Declared count.
        expected: usize,
        /// Supplied item count.
        actual: usize,
    },

    /// Frame is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Header length field disagrees with the layout.
    #[error("frame length mismatch: layout says {expected} bytes, header says {actual}")]
    LengthMismatch {
        /// Length from the layout.
        expected: usize,
        /// Length from the header.
        actual: usize,
    },

    /// Header function id disagrees with the layout.
    #[error("function id mismatch: expected {expected}, got {actual}")]
    FunctionIdMismatch {
        /// Function id of the layout.
        expected: u8,
        /// Function id from the header.
        actual: u8,
    },
}

/// Result type for wire operations.
pub type Result<T> = std::result::Result<T, WireError>;
