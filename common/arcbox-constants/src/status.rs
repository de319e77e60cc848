/// Condition type: the container runtime is up and serving requests.
pub const RUNTIME_READY: &str = "RuntimeReady";

/// Condition type: the pod network plugin is initialized.
pub const NETWORK_READY: &str = "NetworkReady";

/// Condition type: no unignored deprecation warnings are active.
pub const NO_DEPRECATION_WARNINGS: &str = "ContainerdHasNoDeprecationWarnings";

/// Condition reason: at least one deprecation warning survived the ignore list.
pub const HAS_DEPRECATION_WARNINGS: &str = "ContainerdHasDeprecationWarnings";

/// Condition reason: the network plugin reported an error.
pub const NETWORK_NOT_READY: &str = "NetworkPluginNotReady";

/// Condition reason: the runtime health probe reported an error.
pub const RUNTIME_NOT_READY: &str = "RuntimeNotReady";

/// Verbose info key: JSON-encoded runtime configuration snapshot.
pub const INFO_CONFIG: &str = "config";

/// Verbose info key: outcome of the last network plugin status check.
pub const INFO_LAST_CNI_LOAD_STATUS: &str = "lastCNILoadStatus";

/// Verbose info key: JSON-encoded server version.
pub const INFO_VERSION: &str = "version";

/// Network plugin status reported when the last check succeeded.
pub const CNI_LOAD_STATUS_OK: &str = "OK";
