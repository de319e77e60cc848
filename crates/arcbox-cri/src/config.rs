//! CRI configuration.
//!
//! Configuration is loaded from multiple sources with the following priority:
//!
//! 1. Environment variables (`ARCBOX_CRI_*`, nested keys separated by `__`)
//! 2. User configuration file (`~/.config/arcbox/cri.toml`)
//! 3. System configuration file (`/etc/arcbox/cri.toml`)
//! 4. Default values
//!
//! ## Example Configuration File
//!
//! ```toml
//! sandbox_image = "registry.k8s.io/pause:3.10"
//! ignored_deprecation_warnings = ["io.containerd.deprecation/pull-schema-1-image"]
//! default_runtime_name = "runc"
//!
//! [pinned_images]
//! sandbox = "registry.example/pause:override"
//!
//! [runtimes.runc]
//! runtime_type = "io.containerd.runc.v2"
//! user_namespaces = true
//!
//! [cni]
//! bin_dir = "/opt/cni/bin"
//! conf_dir = "/etc/cni/net.d"
//!
//! [logging]
//! level = "info"
//! ```

use crate::error::{CriError, Result};
use arcbox_constants::images::{DEFAULT_RUNTIME_NAME, DEFAULT_RUNTIME_TYPE, DEFAULT_SANDBOX_IMAGE};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CRI plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriConfig {
    /// Sandbox (pause) image used when no pin overrides it.
    pub sandbox_image: String,
    /// Images pinned at startup, keyed by logical name.
    pub pinned_images: BTreeMap<String, String>,
    /// Deprecation warning ids that never affect runtime conditions.
    pub ignored_deprecation_warnings: Vec<String>,
    /// Runtime handler used when a pod does not request one.
    pub default_runtime_name: String,
    /// Configured runtime handlers.
    pub runtimes: BTreeMap<String, RuntimeHandlerConfig>,
    /// Pod network plugin configuration.
    pub cni: CniConfig,
    /// Enable SELinux labeling.
    pub enable_selinux: bool,
    /// Maximum container log line size in bytes.
    pub max_container_log_line_size: i64,
    /// Streaming server bind address.
    pub stream_server_address: String,
    /// Streaming server port.
    pub stream_server_port: String,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Default for CriConfig {
    fn default() -> Self {
        let mut runtimes = BTreeMap::new();
        runtimes.insert(
            DEFAULT_RUNTIME_NAME.to_string(),
            RuntimeHandlerConfig::default(),
        );

        Self {
            sandbox_image: DEFAULT_SANDBOX_IMAGE.to_string(),
            pinned_images: BTreeMap::new(),
            ignored_deprecation_warnings: Vec::new(),
            default_runtime_name: DEFAULT_RUNTIME_NAME.to_string(),
            runtimes,
            cni: CniConfig::default(),
            enable_selinux: false,
            max_container_log_line_size: 16 * 1024,
            stream_server_address: "127.0.0.1".to_string(),
            stream_server_port: "0".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CriConfig {
    /// Loads configuration from files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self> {
        Ok(Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(system_config_path()))
            .merge(Toml::file(user_config_path()))
            .merge(Env::prefixed("ARCBOX_CRI_").split("__"))
            .extract()?)
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("ARCBOX_CRI_").split("__"))
            .extract()?)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sandbox image is empty, the default runtime is
    /// not configured, or a runtime has no type.
    pub fn validate(&self) -> Result<()> {
        if self.sandbox_image.is_empty() {
            return Err(CriError::config("sandbox_image must not be empty"));
        }
        if !self.runtimes.contains_key(&self.default_runtime_name) {
            return Err(CriError::config(format!(
                "default runtime {:?} is not configured",
                self.default_runtime_name
            )));
        }
        if let Some((name, _)) = self
            .runtimes
            .iter()
            .find(|(_, runtime)| runtime.runtime_type.is_empty())
        {
            return Err(CriError::config(format!(
                "runtime {name:?} has an empty runtime_type"
            )));
        }
        Ok(())
    }

    /// Builds the serializable snapshot reported in verbose status.
    #[must_use]
    pub fn snapshot(&self, sandbox_image: impl Into<String>) -> RuntimeConfigSnapshot {
        RuntimeConfigSnapshot {
            sandbox_image: sandbox_image.into(),
            default_runtime_name: self.default_runtime_name.clone(),
            runtimes: self
                .runtimes
                .iter()
                .map(|(name, runtime)| (name.clone(), RuntimeHandlerSnapshot::from(runtime)))
                .collect(),
            cni: CniSnapshot::from(&self.cni),
            enable_selinux: self.enable_selinux,
            max_container_log_line_size: self.max_container_log_line_size,
            stream_server_address: self.stream_server_address.clone(),
            stream_server_port: self.stream_server_port.clone(),
            ignored_deprecation_warnings: self.ignored_deprecation_warnings.clone(),
        }
    }
}

/// Runtime handler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeHandlerConfig {
    /// Shim type (e.g. `io.containerd.runc.v2`).
    pub runtime_type: String,
    /// Snapshotter override for this handler.
    pub snapshotter: Option<String>,
    /// Handler supports recursive read-only mounts.
    pub recursive_read_only_mounts: bool,
    /// Handler supports user namespaces.
    pub user_namespaces: bool,
}

impl Default for RuntimeHandlerConfig {
    fn default() -> Self {
        Self {
            runtime_type: DEFAULT_RUNTIME_TYPE.to_string(),
            snapshotter: None,
            recursive_read_only_mounts: false,
            user_namespaces: false,
        }
    }
}

/// Pod network plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CniConfig {
    /// Directory holding plugin binaries.
    pub bin_dir: PathBuf,
    /// Directory holding network configuration files.
    pub conf_dir: PathBuf,
    /// Maximum number of configuration files loaded.
    pub max_conf_num: u32,
}

impl Default for CniConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("/opt/cni/bin"),
            conf_dir: PathBuf::from("/etc/cni/net.d"),
            max_conf_num: 1,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log format (text, json).
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Effective runtime configuration, as reported under the `config` info key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfigSnapshot {
    /// Resolved sandbox image.
    pub sandbox_image: String,
    /// Default runtime handler name.
    pub default_runtime_name: String,
    /// Configured runtime handlers.
    pub runtimes: BTreeMap<String, RuntimeHandlerSnapshot>,
    /// Pod network plugin configuration.
    pub cni: CniSnapshot,
    /// SELinux labeling enabled.
    pub enable_selinux: bool,
    /// Maximum container log line size in bytes.
    pub max_container_log_line_size: i64,
    /// Streaming server bind address.
    pub stream_server_address: String,
    /// Streaming server port.
    pub stream_server_port: String,
    /// Ignored deprecation warning ids.
    pub ignored_deprecation_warnings: Vec<String>,
}

/// Runtime handler entry of [`RuntimeConfigSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeHandlerSnapshot {
    pub runtime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshotter: Option<String>,
    pub recursive_read_only_mounts: bool,
    pub user_namespaces: bool,
}

impl From<&RuntimeHandlerConfig> for RuntimeHandlerSnapshot {
    fn from(runtime: &RuntimeHandlerConfig) -> Self {
        Self {
            runtime_type: runtime.runtime_type.clone(),
            snapshotter: runtime.snapshotter.clone(),
            recursive_read_only_mounts: runtime.recursive_read_only_mounts,
            user_namespaces: runtime.user_namespaces,
        }
    }
}

/// Network plugin entry of [`RuntimeConfigSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CniSnapshot {
    pub bin_dir: String,
    pub conf_dir: String,
    pub max_conf_num: u32,
}

impl From<&CniConfig> for CniSnapshot {
    fn from(cni: &CniConfig) -> Self {
        Self {
            bin_dir: cni.bin_dir.display().to_string(),
            conf_dir: cni.conf_dir.display().to_string(),
            max_conf_num: cni.max_conf_num,
        }
    }
}

fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("arcbox")
        .join("cri.toml")
}

fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/arcbox/cri.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CriConfig::default();
        assert_eq!(config.sandbox_image, "registry.k8s.io/pause:3.10");
        assert_eq!(config.default_runtime_name, "runc");
        assert_eq!(
            config.runtimes["runc"].runtime_type,
            "io.containerd.runc.v2"
        );
        assert_eq!(config.max_container_log_line_size, 16384);
        assert!(config.ignored_deprecation_warnings.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let config = CriConfig {
            sandbox_image: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CriError::Config(_))));

        let config = CriConfig {
            default_runtime_name: "kata".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("kata"));

        let mut config = CriConfig::default();
        config.runtimes.insert(
            "broken".to_string(),
            RuntimeHandlerConfig {
                runtime_type: String::new(),
                ..Default::default()
            },
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
sandbox_image = "registry.example/pause:custom"
ignored_deprecation_warnings = ["io.containerd.deprecation/foo"]

[pinned_images]
sandbox = "registry.example/pause:pinned"

[runtimes.runsc]
runtime_type = "io.containerd.runsc.v1"
user_namespaces = true
"#
        )
        .unwrap();

        let config = CriConfig::load_from(file.path()).unwrap();
        assert_eq!(config.sandbox_image, "registry.example/pause:custom");
        assert_eq!(
            config.ignored_deprecation_warnings,
            vec!["io.containerd.deprecation/foo".to_string()]
        );
        assert_eq!(
            config.pinned_images.get("sandbox").map(String::as_str),
            Some("registry.example/pause:pinned")
        );
        assert!(config.runtimes.contains_key("runc"));
        assert!(config.runtimes["runsc"].user_namespaces);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_snapshot_field_names() {
        let snapshot = CriConfig::default().snapshot("pause:1");
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["sandboxImage"], "pause:1");
        assert_eq!(value["defaultRuntimeName"], "runc");
        assert_eq!(
            value["runtimes"]["runc"]["runtimeType"],
            "io.containerd.runc.v2"
        );
        assert_eq!(value["cni"]["confDir"], "/etc/cni/net.d");
        assert_eq!(value["maxContainerLogLineSize"], 16384);
        assert!(value.get("logging").is_none());
    }
}
