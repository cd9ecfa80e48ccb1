//! # Sluice CLI
//!
//! Command-line interface for the Sluice file ingestion engine.
//!
//! ## Commands
//!
//! - `sluice ingest <PATH>` - Ingest a file or directory and print the result tree
//! - `sluice plugins` - List the registered ingestor factories
//!
//! ## Examples
//!
//! ```bash
//! # Ingest a document
//! sluice ingest report.xml
//!
//! # Full result tree as JSON
//! sluice ingest ~/inbox --format json
//!
//! # With explicit options
//! sluice ingest scan.png --config sluice.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sluice::{IngestResult, IngestStatus, Manager, ManagerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "Route files to pluggable ingestors and report what came out")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file with an [options] table
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a file or directory
    Ingest {
        /// File or directory to ingest
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Scratch directory for intermediate files (temporary by default)
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// List registered ingestor factories
    Plugins,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sluice=debug,sluice_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => ManagerConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ManagerConfig::new(),
    };

    match cli.command {
        Commands::Ingest {
            path,
            format,
            work_dir,
        } => {
            let manager = Manager::new(config);
            let mut result = IngestResult::from_path(&path);
            let outcome = manager.ingest_into(&mut result, &path, work_dir.as_deref());
            if let Err(err) = &outcome {
                tracing::warn!(error = %err, path = %path.display(), "ingest aborted");
            }

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                OutputFormat::Text => {
                    print_tree(&result, 0);
                }
            }

            if result.status != IngestStatus::Success {
                std::process::exit(1);
            }
        }
        Commands::Plugins => {
            let names = sluice::list_ingestors().context("failed to read ingestor registry")?;
            if names.is_empty() {
                println!("no ingestors registered");
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
    }

    Ok(())
}

fn print_tree(result: &IngestResult, depth: usize) {
    let indent = "  ".repeat(depth);
    let status = match result.status {
        IngestStatus::Success => "ok",
        IngestStatus::Failure => "failed",
        IngestStatus::Stopped => "stopped",
        IngestStatus::Pending => "pending",
    };
    println!("{}{} [{}]", indent, result, status);
    if let Some(message) = &result.error_message {
        println!("{}  error: {}", indent, message);
    }
    if let Some(text) = &result.body_text {
        let preview: String = text.chars().take(80).collect();
        println!("{}  text: {}", indent, preview);
    }
    for child in &result.children {
        print_tree(child, depth + 1);
    }
}
