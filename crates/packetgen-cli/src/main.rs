use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use packetgen_cli::layout::{render_json, render_text};
use packetgen_cli::{run_generate, CliError, GeneratorConfig, Overrides, Result};
use packetgen_schema::load_device;
use packetgen_wire::DeviceLayout;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "packetgen",
    version,
    about = "Generate C bindings and API references from device protocol schemas"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate bindings (and references) for device schemas.
    Generate {
        /// Device schema files; replace the devices listed in the config.
        devices: Vec<PathBuf>,

        /// Generator config file (default: ./packetgen.yaml if present).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip API references.
        #[arg(long)]
        no_docs: bool,

        /// Documentation language.
        #[arg(long)]
        lang: Option<String>,
    },
    /// Print the resolved frame layouts of a device schema.
    Layout {
        /// Device schema file.
        device: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            devices,
            config,
            out,
            no_docs,
            lang,
        } => {
            let cwd = std::env::current_dir().map_err(|source| CliError::Io {
                path: PathBuf::from("."),
                source,
            })?;
            let config = GeneratorConfig::discover(config.as_deref(), &cwd)?.apply(Overrides {
                devices,
                output_dir: out,
                no_docs,
                doc_language: lang,
            });

            let outputs = run_generate(&config)?.into_result()?;
            for output in outputs {
                for path in output.bindings.iter().chain(output.doc.iter()) {
                    println!("{}", path.display());
                }
            }
            Ok(())
        }
        Command::Layout { device, format } => {
            let schema = load_device(&device).map_err(|source| CliError::Schema {
                path: device.clone(),
                source,
            })?;
            let layout = DeviceLayout::resolve(&schema)?;
            let text = match format {
                Format::Text => render_text(&layout)?,
                Format::Json => render_json(&layout)?,
            };
            println!("{}", text.trim_end());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
