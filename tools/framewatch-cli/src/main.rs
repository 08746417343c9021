//! Framewatch CLI: command-line interface for frame-stream analysis.
//!
//! Usage:
//!   framewatch analyze <PATH>    Analyze a directory of demuxed frames
//!   framewatch info <PATH>       Show a saved report
//!   framewatch check             Check available analyzer backends

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "framewatch",
    about = "Per-frame face, posture, and motion-anomaly video analysis",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a frame stream and write the summary report
    Analyze {
        /// Path to the directory of demuxed frame images
        path: PathBuf,

        /// Report output path
        #[arg(short, long, default_value = "relatorio.json")]
        output: PathBuf,

        /// Anomaly threshold in pixels of displacement per frame
        /// (defaults to the configured value)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show a saved summary report
    Info {
        /// Path to the report JSON file
        path: PathBuf,
    },

    /// Check available analyzer backends
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    framewatch_common::logging::init_logging(&framewatch_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Analyze {
            path,
            output,
            threshold,
        } => commands::analyze::run(path, output, threshold),
        Commands::Info { path } => commands::info::run(path),
        Commands::Check => commands::check::run(),
    }
}
