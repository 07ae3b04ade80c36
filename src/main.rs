use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facematch::{config, pipeline};
use log::info;

#[derive(Parser)]
#[command(name = "facematch")]
#[command(
    version,
    about = "Match face embeddings against a registry of known identities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the faces detected in one image against the registry
    Match {
        /// JSON file with one embedding per detected face
        #[arg(short, long)]
        detections: PathBuf,
        /// Registry file (defaults to the configured registry)
        #[arg(short, long)]
        registry: Option<PathBuf>,
        /// Minimum cosine similarity for a match (defaults to config)
        #[arg(short, long)]
        threshold: Option<f32>,
    },
    /// Aggregate multi-photo identities into one embedding each
    Aggregate {
        /// Registry to read
        #[arg(short, long)]
        input: PathBuf,
        /// Registry to write; `.json` for JSON, anything else for postcard
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Open config file in editor
    Config,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            detections,
            registry,
            threshold,
        } => {
            let cfg = config::load_config(None)?;
            let settings = cfg.match_settings(registry, threshold)?;
            run_match(&detections, &settings.registry, settings.threshold)
        }
        Commands::Aggregate { input, output } => {
            pipeline::aggregate_registry(&input, &output)?;
            info!("✓ Registry aggregated: {}", output.display());
            Ok(())
        }
        Commands::Config => open_config(),
    }
}

fn run_match(detections: &Path, registry: &Path, threshold: f32) -> Result<()> {
    let report = pipeline::recognize(detections, registry, threshold)
        .context("Failed to match detected faces")?;

    for candidate in &report.candidates {
        info!(
            "✓ {} (confidence: {:.3})",
            candidate.identity, candidate.confidence
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn open_config() -> Result<()> {
    config::ensure_config(None)?;
    let config_path = config::CONFIG_PATH.as_os_str();
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {:?}", config_path);

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
