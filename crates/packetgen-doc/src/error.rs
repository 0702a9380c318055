use std::path::PathBuf;

use packetgen_wire::WireError;
use thiserror::Error;

/// Errors raised while rendering or writing documentation.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("layout error: {0}")]
    Layout(#[from] WireError),

    #[error("formatting error")]
    Fmt(#[from] std::fmt::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;
