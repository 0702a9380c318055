//! Generator configuration (`packetgen.yaml`).
//!
//! ```yaml
//! output_dir: generated
//! devices:
//!   - devices/distance_ir.yaml
//!   - devices/lcd_16x2.yaml
//! docs: true
//! doc_language: en
//! ```
//!
//! Every key is optional. Relative device paths are resolved against the
//! directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "packetgen.yaml";

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_docs() -> bool {
    true
}

fn default_language() -> String {
    packetgen_schema::DEFAULT_LANGUAGE.to_string()
}

/// What to generate and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root of the output tree; bindings go to `bindings/`, references to `doc/`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Device schema files.
    #[serde(default)]
    pub devices: Vec<PathBuf>,
    /// Whether to render API references.
    #[serde(default = "default_docs")]
    pub docs: bool,
    /// Language of documentation comments and references.
    #[serde(default = "default_language")]
    pub doc_language: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: default_output_dir(),
            devices: Vec::new(),
            docs: default_docs(),
            doc_language: default_language(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub devices: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub no_docs: bool,
    pub doc_language: Option<String>,
}

impl GeneratorConfig {
    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: GeneratorConfig =
            serde_yaml::from_str(&text).map_err(|source| CliError::Config {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base) = path.parent() {
            for device in &mut config.devices {
                if device.is_relative() {
                    *device = base.join(&*device);
                }
            }
        }
        tracing::debug!(
            path = %path.display(),
            devices = config.devices.len(),
            "loaded generator config"
        );
        Ok(config)
    }

    /// Load `explicit` if given, else `packetgen.yaml` in `cwd` if present,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::load(candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command-line overrides.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if !overrides.devices.is_empty() {
            self.devices = overrides.devices;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if overrides.no_docs {
            self.docs = false;
        }
        if let Some(lang) = overrides.doc_language {
            self.doc_language = lang;
        }
        self
    }

    /// Directory receiving `.h`/`.c` files.
    pub fn bindings_dir(&self) -> PathBuf {
        self.output_dir.join("bindings")
    }

    /// Directory receiving API references.
    pub fn doc_dir(&self) -> PathBuf {
        self.output_dir.join("doc")
    }
}
