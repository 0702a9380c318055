//! CLI error types.

use std::path::PathBuf;

use packetgen_c::EmitError;
use packetgen_schema::SchemaError;
use packetgen_wire::WireError;
use thiserror::Error;

/// Errors surfaced by the `packetgen` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading a file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The generator configuration is malformed.
    #[error("invalid generator config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A device schema failed to load or validate.
    #[error("device {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error(transparent)]
    Layout(#[from] WireError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("formatting error")]
    Fmt(#[from] std::fmt::Error),

    #[error("failed to encode layout as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither the command line nor the config named any device.
    #[error("no device schemas given")]
    NoDevices,

    /// Some devices failed; the others were generated.
    #[error("{failed} of {total} devices failed to generate")]
    Failed { failed: usize, total: usize },
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
