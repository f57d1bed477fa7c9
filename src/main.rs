//! Preparar CLI
//!
//! Resolves declarative training-run parameters into a frozen run
//! configuration.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a parameter file and print the frozen record
//! preparar resolve config.yaml
//!
//! # Resolve with overrides
//! preparar resolve config.yaml --batch-size 32 --device cpu
//!
//! # Validate a parameter file
//! preparar validate config.yaml --detailed
//!
//! # Show the default table
//! preparar defaults --format yaml
//! ```

use clap::Parser;
use preparar::{
    advisories, apply_overrides, load_partial, resolve, Cli, Command, FixedProbe, HostProbe,
    OutputFormat, PartialRunConfig, RunConfig,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args, log_level),
        Command::Validate(args) => run_validate(args, log_level),
        Command::Defaults(args) => run_defaults(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

fn run_resolve(args: preparar::ResolveArgs, level: LogLevel) -> Result<(), String> {
    let mut partial = match &args.config {
        Some(path) => {
            log(
                level,
                LogLevel::Verbose,
                &format!("Loading parameters from {}", path.display()),
            );
            load_partial(path).map_err(|e| e.to_string())?
        }
        None => PartialRunConfig::new(),
    };

    apply_overrides(&mut partial, &args);

    let config = resolve(&partial, &HostProbe::default()).map_err(|e| e.to_string())?;

    for note in advisories(&config) {
        if level != LogLevel::Quiet {
            eprintln!("Warning: {note}");
        }
    }

    print_config(&config, args.format).map_err(|e| e.to_string())?;
    Ok(())
}

fn run_validate(args: preparar::ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating {}", args.config.display()),
    );

    let partial = load_partial(&args.config).map_err(|e| e.to_string())?;
    let config = resolve(&partial, &HostProbe::default()).map_err(|e| e.to_string())?;

    log(level, LogLevel::Normal, "Configuration is valid");

    for note in advisories(&config) {
        if level != LogLevel::Quiet {
            eprintln!("Warning: {note}");
        }
    }

    if args.detailed {
        println!();
        print_summary(&config);
    }

    Ok(())
}

fn run_defaults(args: preparar::DefaultsArgs) -> Result<(), String> {
    // The default table is host-independent: device auto-detection is
    // bypassed so the same table prints on every machine.
    let config =
        resolve(&PartialRunConfig::new(), &FixedProbe::absent()).map_err(|e| e.to_string())?;
    print_config(&config, args.format).map_err(|e| e.to_string())
}

fn print_config(config: &RunConfig, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Text => print_summary(config),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(config)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(config)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }
    Ok(())
}

fn print_summary(config: &RunConfig) {
    println!("Run configuration:");
    println!("  Output directory: {}", config.output_directory());
    println!("  Dataset: {}", config.dataset_identifier());
    println!("  Device: {}", config.compute_device());
    println!("  Compilation: {}", config.use_compilation());
    println!();
    println!(
        "  Model: {} layers, {} heads, {}-dim embedding",
        config.layer_count(),
        config.head_count(),
        config.embedding_width()
    );
    println!("  Context length: {}", config.context_length());
    println!("  Dropout: {}", config.dropout_rate());
    println!();
    println!(
        "  Batch size: {} (effective {})",
        config.batch_size(),
        config.effective_batch_size()
    );
    println!(
        "  Learning rate: {} (min {}, beta2 {})",
        config.learning_rate(),
        config.min_lr(),
        config.beta2()
    );
    println!(
        "  Iterations: {} (warmup {}, decay over {})",
        config.max_iters(),
        config.warmup_iters(),
        config.lr_decay_iters()
    );
    println!(
        "  Eval every {} steps ({} iters), log every {} steps",
        config.eval_interval(),
        config.eval_iters(),
        config.log_interval()
    );
    if config.experiment_tracking_enabled() {
        println!();
        println!(
            "  Tracking: project {}, run {}",
            config.experiment_project_name(),
            config.experiment_run_name()
        );
    }
}
