//! # packetgen-c
//!
//! Emits a C binding (`<category>_<device>.h` and `.c`) for one device.
//!
//! The generated code targets a small connection library, `ip_connection.h`,
//! which must provide:
//!
//! - `Device` with `ipcon`, `stack_id`, `write_mutex`, `response`
//!   (`function_id`, `length`, `buffer`), `name`, `firmware_version`,
//!   `binding_version`, `expected_name`, `registered_callbacks` and
//!   `callback_wrappers`;
//! - `IPConCallback`, a generic function pointer type;
//! - `ipcon_device_create`, `ipcon_device_write` (returns a status code),
//!   `ipcon_device_expect_response` (non-zero on timeout) and
//!   `ipcon_mutex_lock`/`ipcon_mutex_unlock`;
//! - `ipcon_leconvert_<type>_to`/`_from` for every multi-byte type.
//!
//! ```no_run
//! use packetgen_schema::load_device;
//!
//! let device = load_device("devices/distance_ir.yaml")?;
//! let bindings = packetgen_c::generate(&device)?;
//! bindings.write_to("out/bindings")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod call;
mod callback;
mod error;
mod frame;
mod header;
mod types;

use std::path::{Path, PathBuf};

use packetgen_schema::{Device, DEFAULT_LANGUAGE};
use packetgen_wire::DeviceLayout;

pub use error::{EmitError, Result};
pub use frame::{marshal, packed_structs, struct_name, unmarshal};
pub use header::status_defines;
pub use types::{
    c_type, callback_parameter_list, file_stem, function_parameter, parameter_list, storage_type,
};

/// Generated binding for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CBindings {
    /// File name without extension, `bricklet_distance_ir`.
    pub file_stem: String,
    /// Contents of the `.h` file.
    pub header: String,
    /// Contents of the `.c` file.
    pub source: String,
}

impl CBindings {
    /// Header file name.
    pub fn header_name(&self) -> String {
        format!("{}.h", self.file_stem)
    }

    /// Source file name.
    pub fn source_name(&self) -> String {
        format!("{}.c", self.file_stem)
    }

    /// Write both files into `dir`, creating it if needed.
    ///
    /// Both files are staged under temporary names first; if either cannot
    /// be written or moved into place, nothing is left behind. Returns the
    /// paths written, header first.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|source| EmitError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let files = [
            (self.header_name(), &self.header),
            (self.source_name(), &self.source),
        ];
        let mut staged = Vec::new();
        for (name, contents) in files {
            let staging = dir.join(format!(".{}.tmp", name));
            if let Err(source) = std::fs::write(&staging, contents) {
                discard(staged.iter().map(|(tmp, _)| tmp));
                discard([&staging]);
                return Err(EmitError::Write { path: staging, source });
            }
            staged.push((staging, dir.join(name)));
        }

        let mut written = Vec::new();
        for (i, (staging, path)) in staged.iter().enumerate() {
            if let Err(source) = std::fs::rename(staging, path) {
                discard(written.iter());
                discard(staged[i..].iter().map(|(tmp, _)| tmp));
                return Err(EmitError::Write {
                    path: path.clone(),
                    source,
                });
            }
            tracing::info!(path = %path.display(), "wrote C binding");
            written.push(path.clone());
        }
        Ok(written)
    }
}

fn discard<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(err) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not remove partial output");
        }
    }
}

/// Generate the binding with English documentation comments.
pub fn generate(device: &Device) -> Result<CBindings> {
    generate_localized(device, DEFAULT_LANGUAGE)
}

/// Generate the binding with documentation comments in `lang`.
///
/// Either the whole binding is produced or an error is returned; layout
/// problems never yield partial output.
pub fn generate_localized(device: &Device, lang: &str) -> Result<CBindings> {
    let layout = DeviceLayout::resolve(device)?;
    let names = types::DeviceNames::new(device);
    let stem = file_stem(device);
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();

    let header = header::header_file(device, &names, &stem, &date, lang)?;
    let source = header::source_file(device, &layout, &names, &stem, &date)?;

    tracing::debug!(
        device = %device.name(),
        functions = device.functions().count(),
        callbacks = device.callback_count(),
        "generated C binding"
    );

    Ok(CBindings {
        file_stem: stem,
        header,
        source,
    })
}
