//! # packetgen-doc
//!
//! Renders a Markdown API reference for a device straight from its schema.
//!
//! Functions are grouped by documentation category (basic, advanced,
//! low-level) in declaration order, with callbacks last. Every entry shows
//! the function id, the frame sizes and an element table in wire order.
//!
//! Documentation is independent of binding generation: callers report a
//! [`DocError`] as a warning and carry on.

mod error;
mod labels;
mod render;

use std::path::{Path, PathBuf};

use packetgen_schema::Device;

pub use error::{DocError, Result};
pub use labels::Labels;
pub use render::render_markdown;

/// File name of the reference for `device`, `DistanceIR_Bricklet.md`.
pub fn file_name(device: &Device) -> String {
    format!("{}_{}.md", device.name(), device.category())
}

/// Render the reference and write it into `dir`.
pub fn write_markdown(device: &Device, lang: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let text = render_markdown(device, lang)?;
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| DocError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name(device));
    std::fs::write(&path, text).map_err(|source| DocError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), lang, "wrote API reference");
    Ok(path)
}
