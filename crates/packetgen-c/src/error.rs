//! Emitter error types.

use std::path::PathBuf;

use packetgen_wire::WireError;
use thiserror::Error;

/// Errors raised while emitting or writing C bindings.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The device does not resolve to a valid wire layout.
    #[error("layout error: {0}")]
    Layout(#[from] WireError),

    /// Formatting into the output buffer failed.
    #[error("formatting error")]
    Fmt(#[from] std::fmt::Error),

    /// Writing an output file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the C emitter.
pub type Result<T> = std::result::Result<T, EmitError>;
