//! Config command implementation.

use anyhow::Result;
use arcbox_cri::{CriConfig, PinnedImageStore, StaticIntrospection, StatusService};
use std::sync::Arc;

/// Prints the effective configuration snapshot.
pub fn execute(config: &CriConfig) -> Result<()> {
    let service = StatusService::new(
        Arc::new(config.clone()),
        Arc::new(StaticIntrospection::default()),
        Arc::new(PinnedImageStore::with_pins(config.pinned_images.clone())),
    );
    println!("{}", serde_json::to_string_pretty(&service.config_snapshot())?);
    Ok(())
}
