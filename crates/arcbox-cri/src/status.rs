//! Runtime status assembly.
//!
//! [`StatusService::status`] gathers readiness facts and deprecation
//! warnings from its collaborators, turns them into conditions and, for
//! verbose requests, attaches the effective configuration. A failed
//! introspection call fails the whole request; no partial report is built.

use crate::condition::{RuntimeCondition, deprecation_condition, readiness_conditions};
use crate::config::{CriConfig, RuntimeConfigSnapshot, RuntimeHandlerConfig};
use crate::error::{CriError, Result};
use crate::image::DynPinnedImages;
use crate::introspection::DynIntrospection;
use crate::probe::DynHealthProbe;
use arcbox_constants::{images::SANDBOX_PIN_KEY, status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Status request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    /// Include the `info` map in the report.
    pub verbose: bool,
}

impl StatusRequest {
    /// A verbose request.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

/// Features advertised by a runtime handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeHandlerFeatures {
    /// Recursive read-only mounts are supported.
    pub recursive_read_only_mounts: bool,
    /// User namespaces are supported.
    pub user_namespaces: bool,
}

/// A runtime handler available to pods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeHandler {
    /// Handler name. Empty for the default handler.
    pub name: String,
    /// Supported features.
    pub features: RuntimeHandlerFeatures,
}

impl RuntimeHandler {
    fn from_config(name: impl Into<String>, config: &RuntimeHandlerConfig) -> Self {
        Self {
            name: name.into(),
            features: RuntimeHandlerFeatures {
                recursive_read_only_mounts: config.recursive_read_only_mounts,
                user_namespaces: config.user_namespaces,
            },
        }
    }
}

/// Runtime status report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeStatusReport {
    /// Conditions in fixed order: runtime, network, deprecations.
    pub conditions: Vec<RuntimeCondition>,
    /// Default handler first, then configured handlers by name.
    pub runtime_handlers: Vec<RuntimeHandler>,
    /// Extra information. Empty unless the request was verbose.
    pub info: BTreeMap<String, String>,
}

impl RuntimeStatusReport {
    /// Returns true if every condition is healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.conditions.iter().all(RuntimeCondition::is_healthy)
    }

    /// Parses the configuration snapshot from the `config` info entry.
    ///
    /// Returns `None` for non-verbose reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not a valid snapshot.
    pub fn config(&self) -> Result<Option<RuntimeConfigSnapshot>> {
        self.info
            .get(status::INFO_CONFIG)
            .map(|raw| {
                serde_json::from_str(raw).map_err(|e| CriError::serialization("runtime config", e))
            })
            .transpose()
    }
}

/// CRI status service.
pub struct StatusService {
    config: Arc<CriConfig>,
    introspection: DynIntrospection,
    images: DynPinnedImages,
    network: Option<DynHealthProbe>,
    runtime: Option<DynHealthProbe>,
}

impl StatusService {
    /// Creates a status service. Readiness probes default to always ready.
    #[must_use]
    pub fn new(
        config: Arc<CriConfig>,
        introspection: DynIntrospection,
        images: DynPinnedImages,
    ) -> Self {
        Self {
            config,
            introspection,
            images,
            network: None,
            runtime: None,
        }
    }

    /// Sets the pod network readiness probe.
    #[must_use]
    pub fn with_network_probe(mut self, probe: DynHealthProbe) -> Self {
        self.network = Some(probe);
        self
    }

    /// Sets the runtime readiness probe.
    #[must_use]
    pub fn with_runtime_probe(mut self, probe: DynHealthProbe) -> Self {
        self.runtime = Some(probe);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CriConfig {
        &self.config
    }

    /// Returns the effective sandbox image: the `"sandbox"` pin if present,
    /// otherwise the configured default.
    #[must_use]
    pub fn sandbox_image(&self) -> String {
        match self.images.pinned_image(SANDBOX_PIN_KEY) {
            Some(image) => {
                debug!(image = %image, "using pinned sandbox image");
                image
            }
            None => self.config.sandbox_image.clone(),
        }
    }

    /// Returns the effective configuration snapshot.
    #[must_use]
    pub fn config_snapshot(&self) -> RuntimeConfigSnapshot {
        self.config.snapshot(self.sandbox_image())
    }

    /// Builds the runtime status report.
    ///
    /// # Errors
    ///
    /// Returns [`CriError::Dependency`] if the introspection service fails and
    /// [`CriError::Serialization`] if part of the report cannot be encoded.
    pub async fn status(&self, request: &StatusRequest) -> Result<RuntimeStatusReport> {
        let network_status = check_probe("network", self.network.as_ref()).await;
        let runtime_status = check_probe("runtime", self.runtime.as_ref()).await;

        let server = self
            .introspection
            .server()
            .await
            .map_err(|e| CriError::dependency("introspection server", e))?;

        let mut conditions = readiness_conditions(network_status.is_ok(), runtime_status.is_ok());
        let deprecations = deprecation_condition(
            &server.deprecations,
            self.config.ignored_deprecation_warnings.as_slice(),
        )?;
        if !deprecations.is_healthy() {
            warn!(warnings = %deprecations.message, "runtime has active deprecation warnings");
        }
        conditions.push(deprecations);

        let mut info = BTreeMap::new();
        if request.verbose {
            let config = serde_json::to_string(&self.config_snapshot())
                .map_err(|e| CriError::serialization("runtime config", e))?;
            let version = serde_json::to_string(env!("CARGO_PKG_VERSION"))
                .map_err(|e| CriError::serialization("version", e))?;
            let cni_status = network_status
                .err()
                .unwrap_or_else(|| status::CNI_LOAD_STATUS_OK.to_string());

            info.insert(status::INFO_CONFIG.to_string(), config);
            info.insert(status::INFO_VERSION.to_string(), version);
            info.insert(status::INFO_LAST_CNI_LOAD_STATUS.to_string(), cni_status);
        }

        let report = RuntimeStatusReport {
            conditions,
            runtime_handlers: self.runtime_handlers(),
            info,
        };
        debug!(
            verbose = request.verbose,
            healthy = report.is_healthy(),
            conditions = report.conditions.len(),
            "assembled runtime status"
        );
        Ok(report)
    }

    fn runtime_handlers(&self) -> Vec<RuntimeHandler> {
        let default = self
            .config
            .runtimes
            .get(&self.config.default_runtime_name)
            .map(|runtime| RuntimeHandler::from_config("", runtime));

        default
            .into_iter()
            .chain(
                self.config
                    .runtimes
                    .iter()
                    .map(|(name, runtime)| RuntimeHandler::from_config(name.as_str(), runtime)),
            )
            .collect()
    }
}

/// Runs an optional probe. A missing probe counts as ready; a failure is
/// returned as its message.
async fn check_probe(
    name: &'static str,
    probe: Option<&DynHealthProbe>,
) -> std::result::Result<(), String> {
    let Some(probe) = probe else {
        return Ok(());
    };
    probe.check().await.map_err(|e| {
        warn!(probe = name, error = %e, "readiness check failed");
        e.to_string()
    })
}
