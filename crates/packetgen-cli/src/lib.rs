//! # packetgen-cli
//!
//! Library half of the `packetgen` binary: generator configuration, the
//! `generate` run and layout printing.

pub mod config;
pub mod error;
pub mod generate;
pub mod layout;

pub use config::{GeneratorConfig, Overrides, DEFAULT_CONFIG_FILE};
pub use error::{CliError, Result};
pub use generate::{run_generate, DeviceOutput, GenerateReport};
