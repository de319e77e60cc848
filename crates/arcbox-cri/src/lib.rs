//! # arcbox-cri
//!
//! Container Runtime Interface status reporting for `ArcBox`.
//!
//! This crate derives the runtime health report returned by the CRI
//! `Status` call:
//!
//! - Readiness conditions for the runtime and the pod network
//! - A deprecation condition built from introspection warnings, filtered
//!   against the operator's ignore list
//! - A configuration snapshot including the resolved sandbox image
//!
//! Transport, image pinning storage and the introspection backend are
//! collaborators reached through the [`Introspection`], [`PinnedImages`]
//! and [`HealthProbe`] traits.
//!
//! ## Example
//!
//! ```rust,no_run
//! use arcbox_cri::{CriConfig, PinnedImageStore, StaticIntrospection, StatusRequest, StatusService};
//! use std::sync::Arc;
//!
//! # async fn example() -> arcbox_cri::Result<()> {
//! let service = StatusService::new(
//!     Arc::new(CriConfig::default()),
//!     Arc::new(StaticIntrospection::default()),
//!     Arc::new(PinnedImageStore::new()),
//! );
//! let report = service.status(&StatusRequest::verbose()).await?;
//! assert!(report.is_healthy());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod condition;
pub mod config;
pub mod deprecation;
pub mod error;
pub mod image;
pub mod introspection;
pub mod probe;
pub mod status;

pub use condition::{ConditionType, RuntimeCondition, deprecation_condition, readiness_conditions};
pub use config::{CriConfig, RuntimeConfigSnapshot};
pub use deprecation::{DeprecationWarning, filter_deprecations};
pub use error::{CriError, Result};
pub use image::{DynPinnedImages, PinnedImageStore, PinnedImages};
pub use introspection::{DynIntrospection, Introspection, ServerInfo, StaticIntrospection};
pub use probe::{DynHealthProbe, HealthProbe, StaticProbe};
pub use status::{RuntimeHandler, RuntimeHandlerFeatures, RuntimeStatusReport, StatusRequest, StatusService};
