//! CLI command implementations.

use anyhow::{Context, Result};
use arcbox_cri::CriConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod config;
pub mod status;

/// ArcBox CRI - container runtime status
#[derive(Parser)]
#[command(name = "arcbox-cri")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to system and user cri.toml)
    #[arg(long, global = true, env = "ARCBOX_CRI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Report runtime status conditions
    Status(status::StatusArgs),

    /// Show the effective runtime configuration
    Config,
}

/// Loads and validates the configuration.
pub fn load_config(path: Option<&Path>) -> Result<CriConfig> {
    let config = match path {
        Some(path) => CriConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => CriConfig::load().context("failed to load configuration")?,
    };
    config.validate()?;
    Ok(config)
}
