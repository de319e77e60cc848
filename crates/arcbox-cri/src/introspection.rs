//! Introspection collaborator.

use crate::deprecation::DeprecationWarning;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared introspection trait object.
pub type DynIntrospection = Arc<dyn Introspection>;

/// Server information reported by the introspection service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    /// Server instance UUID.
    pub uuid: String,
    /// Currently active deprecation warnings.
    pub deprecations: Vec<DeprecationWarning>,
}

/// Source of server-level runtime facts.
#[async_trait]
pub trait Introspection: Send + Sync {
    /// Returns current server information, including deprecation warnings.
    async fn server(&self) -> arcbox_error::Result<ServerInfo>;
}

/// Introspection backed by a fixed set of warnings.
#[derive(Debug, Clone, Default)]
pub struct StaticIntrospection {
    info: ServerInfo,
}

impl StaticIntrospection {
    /// Creates an introspection source reporting `deprecations`.
    #[must_use]
    pub fn new(deprecations: Vec<DeprecationWarning>) -> Self {
        Self {
            info: ServerInfo {
                uuid: String::new(),
                deprecations,
            },
        }
    }

    /// Sets the reported server UUID.
    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.info.uuid = uuid.into();
        self
    }
}

#[async_trait]
impl Introspection for StaticIntrospection {
    async fn server(&self) -> arcbox_error::Result<ServerInfo> {
        Ok(self.info.clone())
    }
}
