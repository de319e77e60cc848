//! Error types for runtime status reporting.

use arcbox_error::CommonError;
use thiserror::Error;

/// Result type alias for status operations.
pub type Result<T> = std::result::Result<T, CriError>;

/// Errors that can occur while assembling a runtime status report.
#[derive(Debug, Error)]
pub enum CriError {
    /// A collaborator call failed. The whole request fails with it.
    #[error("{operation} failed: {source}")]
    Dependency {
        /// Collaborator call that failed.
        operation: &'static str,
        /// Error reported by the collaborator.
        #[source]
        source: CommonError,
    },

    /// Part of the report could not be encoded.
    #[error("failed to encode {what}: {source}")]
    Serialization {
        /// What was being encoded.
        what: &'static str,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Common errors (I/O, etc.).
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CriError {
    /// Wraps a collaborator failure with the name of the failed call.
    #[must_use]
    pub const fn dependency(operation: &'static str, source: CommonError) -> Self {
        Self::Dependency { operation, source }
    }

    /// Wraps an encoder failure with the name of the encoded value.
    #[must_use]
    pub const fn serialization(what: &'static str, source: serde_json::Error) -> Self {
        Self::Serialization { what, source }
    }

    /// Creates a new configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if a collaborator call failed.
    #[must_use]
    pub const fn is_dependency(&self) -> bool {
        matches!(self, Self::Dependency { .. })
    }
}

impl From<figment::Error> for CriError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
