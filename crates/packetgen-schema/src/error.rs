//! Error types for schema loading and validation.

use thiserror::Error;

/// Errors that can occur while loading or validating a device schema.
///
/// All of these are fatal for the device they concern: a schema that fails
/// validation must never reach an emitter.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Element declares a scalar type that is not part of the type table.
    #[error("packet '{packet}': element '{element}' has unrecognized type '{type_name}'")]
    UnknownType {
        /// Packet containing the element.
        packet: String,
        /// Element name.
        element: String,
        /// The offending type spelling.
        type_name: String,
    },

    /// Element direction is neither `in` nor `out`.
    #[error("packet '{packet}': element '{element}' has invalid direction '{direction}'")]
    InvalidDirection {
        /// Packet containing the element.
        packet: String,
        /// Element name.
        element: String,
        /// The offending direction spelling.
        direction: String,
    },

    /// A callback packet declares a host-to-device element.
    #[error("callback '{packet}': element '{element}' must be 'out', callbacks only carry device-to-host data")]
    CallbackInput {
        /// Callback packet name.
        packet: String,
        /// Element name.
        element: String,
    },

    /// Function packet element without a direction.
    #[error("function '{packet}': element '{element}' needs a direction ('in' or 'out')")]
    MissingDirection {
        /// Function packet name.
        packet: String,
        /// Element name.
        element: String,
    },

    /// Function id outside of 1..=255.
    #[error("packet '{packet}': function id {id} is out of range (1-255)")]
    FunctionIdOutOfRange {
        /// Packet name.
        packet: String,
        /// The declared id.
        id: u32,
    },

    /// Two packets share a function id.
    #[error("function id {id} is used by both '{first}' and '{second}'")]
    DuplicateFunctionId {
        /// The colliding id.
        id: u8,
        /// Packet that claimed the id first.
        first: String,
        /// Packet that collided with it.
        second: String,
    },

    /// Two packets share a name.
    #[error("duplicate packet name '{0}'")]
    DuplicatePacketName(String),

    /// Two elements of one packet share a name.
    #[error("packet '{packet}': duplicate element name '{element}'")]
    DuplicateElementName {
        /// Packet name.
        packet: String,
        /// Element name.
        element: String,
    },

    /// Element name that cannot appear in generated code.
    #[error("packet '{packet}': element name '{element}' {reason}")]
    InvalidElementName {
        /// Packet name.
        packet: String,
        /// Element name.
        element: String,
        /// What is wrong with the name.
        reason: String,
    },

    /// Element count of zero.
    #[error("packet '{packet}': element '{element}' has count 0")]
    ZeroCount {
        /// Packet name.
        packet: String,
        /// Element name.
        element: String,
    },

    /// Required field is empty.
    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::DuplicateFunctionId {
            id: 7,
            first: "GetValue".to_string(),
            second: "ValueReached".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("function id 7"));
        assert!(text.contains("GetValue"));
        assert!(text.contains("ValueReached"));

        let err = SchemaError::UnknownType {
            packet: "SetMode".to_string(),
            element: "mode".to_string(),
            type_name: "uint24".to_string(),
        };
        assert!(err.to_string().contains("uint24"));
    }
}
