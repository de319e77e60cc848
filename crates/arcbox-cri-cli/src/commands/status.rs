//! Status command implementation.

use anyhow::{Context, Result, bail};
use arcbox_cri::{
    CriConfig, DeprecationWarning, PinnedImageStore, StaticIntrospection, StatusRequest,
    StatusService,
};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Include configuration and diagnostics in the report
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON file with active deprecation warnings
    #[arg(long)]
    pub deprecations: Option<PathBuf>,

    /// Pin an image (KEY=IMAGE), overriding configured pins
    #[arg(long = "pin", value_name = "KEY=IMAGE")]
    pub pins: Vec<String>,
}

/// Executes the status command.
pub async fn execute(config: CriConfig, args: StatusArgs) -> Result<()> {
    let images = PinnedImageStore::with_pins(config.pinned_images.clone());
    for pin in &args.pins {
        let (key, image) = parse_pin(pin)?;
        images.pin(key, image)?;
    }

    let deprecations = match args.deprecations.as_deref() {
        Some(path) => read_deprecations(path)?,
        None => Vec::new(),
    };

    let service = StatusService::new(
        Arc::new(config),
        Arc::new(StaticIntrospection::new(deprecations)),
        Arc::new(images),
    );
    let report = service
        .status(&StatusRequest {
            verbose: args.verbose,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_pin(pin: &str) -> Result<(&str, &str)> {
    match pin.split_once('=') {
        Some((key, image)) if !key.is_empty() && !image.is_empty() => Ok((key, image)),
        _ => bail!("invalid pin {pin:?}, expected KEY=IMAGE"),
    }
}

fn read_deprecations(path: &Path) -> Result<Vec<DeprecationWarning>> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("failed to parse deprecation warnings from {}", path.display()))
}
