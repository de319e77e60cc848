/// Pin key for the pod sandbox (pause) image.
pub const SANDBOX_PIN_KEY: &str = "sandbox";

/// Sandbox image used when no pin overrides it.
pub const DEFAULT_SANDBOX_IMAGE: &str = "registry.k8s.io/pause:3.10";

/// Runtime handler used when the configuration does not name one.
pub const DEFAULT_RUNTIME_NAME: &str = "runc";

/// Shim type of the default runtime handler.
pub const DEFAULT_RUNTIME_TYPE: &str = "io.containerd.runc.v2";
