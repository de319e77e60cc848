//! Readiness probes for the runtime and the pod network.

use async_trait::async_trait;
use std::sync::Arc;

/// Shared probe trait object.
pub type DynHealthProbe = Arc<dyn HealthProbe>;

/// A readiness check. `Ok(())` means ready.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Runs the check.
    async fn check(&self) -> arcbox_error::Result<()>;
}

/// Probe with a fixed outcome.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    failure: Option<String>,
}

impl StaticProbe {
    /// A probe that always succeeds.
    #[must_use]
    pub const fn ready() -> Self {
        Self { failure: None }
    }

    /// A probe that always fails with `reason`.
    #[must_use]
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
        }
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn check(&self) -> arcbox_error::Result<()> {
        match &self.failure {
            None => Ok(()),
            Some(reason) => Err(arcbox_error::CommonError::unavailable(reason.clone())),
        }
    }
}
