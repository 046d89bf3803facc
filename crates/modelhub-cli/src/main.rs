mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "modelhub",
    version,
    about = "Load model hub metadata into a document store"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Path to pipeline YAML file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, validate and load model metadata
    Run {
        /// Stop extracting once this many records are collected
        #[arg(long, conflicts_with = "unbounded")]
        max_models: Option<usize>,
        /// Follow pagination until the source runs out of pages
        #[arg(long)]
        unbounded: bool,
        /// Records per insert batch
        #[arg(long)]
        batch_size: Option<usize>,
        /// Preview mode: skip the document store, print records to stdout
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate pipeline configuration and connectivity
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = commands::load_config(cli.config.as_deref())?;
    if let Commands::Run {
        max_models,
        unbounded,
        batch_size,
        ..
    } = &cli.command
    {
        commands::apply_overrides(
            &mut config,
            &commands::RunOverrides {
                max_models: *max_models,
                unbounded: *unbounded,
                batch_size: *batch_size,
            },
        );
    }
    commands::validate(&config)?;

    let _guard = logging::init(&cli.log_level, &config.logging.file)?;

    match cli.command {
        Commands::Run { dry_run, .. } => commands::run::execute(&config, dry_run),
        Commands::Check => commands::check::execute(&config),
    }
}
