//! `packetgen generate`.

use std::path::{Path, PathBuf};

use packetgen_schema::load_device;

use crate::config::GeneratorConfig;
use crate::error::{CliError, Result};

/// Files produced for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOutput {
    pub schema: PathBuf,
    pub bindings: Vec<PathBuf>,
    pub doc: Option<PathBuf>,
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub generated: Vec<DeviceOutput>,
    pub failed: Vec<(PathBuf, CliError)>,
    pub doc_warnings: usize,
}

impl GenerateReport {
    /// `Ok` if every device generated.
    pub fn into_result(self) -> Result<Vec<DeviceOutput>> {
        if self.failed.is_empty() {
            Ok(self.generated)
        } else {
            Err(CliError::Failed {
                failed: self.failed.len(),
                total: self.failed.len() + self.generated.len(),
            })
        }
    }
}

/// Generate bindings (and references, if enabled) for every configured device.
///
/// A device that fails to load or lay out gets no output at all; the run
/// moves on to the next device. A failing reference is only a warning.
pub fn run_generate(config: &GeneratorConfig) -> Result<GenerateReport> {
    if config.devices.is_empty() {
        return Err(CliError::NoDevices);
    }

    let mut report = GenerateReport::default();
    for schema in &config.devices {
        match generate_device(config, schema, &mut report.doc_warnings) {
            Ok(output) => report.generated.push(output),
            Err(err) => {
                tracing::error!(device = %schema.display(), error = %err, "generation failed");
                report.failed.push((schema.clone(), err));
            }
        }
    }

    tracing::info!(
        generated = report.generated.len(),
        failed = report.failed.len(),
        doc_warnings = report.doc_warnings,
        "generation finished"
    );
    Ok(report)
}

fn generate_device(
    config: &GeneratorConfig,
    schema: &Path,
    doc_warnings: &mut usize,
) -> Result<DeviceOutput> {
    let device = load_device(schema).map_err(|source| CliError::Schema {
        path: schema.to_path_buf(),
        source,
    })?;

    // Everything is rendered in memory before the first file is written.
    let bindings = packetgen_c::generate_localized(&device, &config.doc_language)?;
    let written = bindings.write_to(config.bindings_dir())?;

    let doc = if config.docs {
        match packetgen_doc::write_markdown(&device, &config.doc_language, config.doc_dir()) {
            Ok(path) => Some(path),
            Err(err) => {
                *doc_warnings += 1;
                tracing::warn!(device = %device.name(), error = %err, "skipping API reference");
                None
            }
        }
    } else {
        None
    };

    Ok(DeviceOutput {
        schema: schema.to_path_buf(),
        bindings: written,
        doc,
    })
}
