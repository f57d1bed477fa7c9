//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! preparar resolve config.yaml
//! preparar resolve config.yaml --batch-size 32 --device cpu
//! preparar resolve --format json
//! preparar validate config.yaml --detailed
//! preparar defaults --format yaml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::{DevicePreference, PartialRunConfig};

/// Preparar: training-run configuration resolver
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "preparar")]
#[command(version)]
#[command(about = "Resolve declarative training-run parameters into a frozen run configuration")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Resolve a parameter file (or the defaults) and print the frozen record
    Resolve(ResolveArgs),

    /// Validate a parameter file without emitting the resolved record
    Validate(ValidateArgs),

    /// Print the fully-resolved default table
    Defaults(DefaultsArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ResolveArgs {
    /// Path to YAML parameter file; omit to resolve from defaults alone
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Override output directory
    #[arg(short, long)]
    pub output_directory: Option<String>,

    /// Override batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override context length
    #[arg(short, long)]
    pub context_length: Option<usize>,

    /// Override learning rate
    #[arg(short, long)]
    pub learning_rate: Option<f32>,

    /// Override total optimization steps
    #[arg(short, long)]
    pub max_iters: Option<usize>,

    /// Override device preference (auto, accelerator, cpu)
    #[arg(short, long)]
    pub device: Option<DevicePreference>,

    /// Override the graph-compilation toggle
    #[arg(long)]
    pub use_compilation: Option<bool>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML parameter file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show the resolved field values after validation
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the defaults command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct DefaultsArgs {
    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for resolved records
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: text, json, yaml",
                s
            )),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a partial configuration
///
/// Overrides land in the partial record before resolution, so they go
/// through the same validation as file-supplied values.
pub fn apply_overrides(partial: &mut PartialRunConfig, args: &ResolveArgs) {
    if let Some(output_directory) = &args.output_directory {
        partial.output_directory = Some(output_directory.clone());
    }
    if let Some(batch_size) = args.batch_size {
        partial.batch_size = Some(batch_size);
    }
    if let Some(context_length) = args.context_length {
        partial.context_length = Some(context_length);
    }
    if let Some(learning_rate) = args.learning_rate {
        partial.learning_rate = Some(learning_rate);
    }
    if let Some(max_iters) = args.max_iters {
        partial.max_iters = Some(max_iters);
    }
    if let Some(device) = args.device {
        partial.compute_device = Some(device);
    }
    if let Some(use_compilation) = args.use_compilation {
        partial.use_compilation = Some(use_compilation);
    }
}
