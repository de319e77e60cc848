//! Common error types for `ArcBox`.
//!
//! Collaborators consumed by the runtime status service (introspection,
//! image pinning, health probes) report failures through [`CommonError`].
//! Higher layers wrap it with the context of the call that failed.
//!
//! # Usage
//!
//! ```rust
//! use arcbox_error::CommonError;
//!
//! fn introspect() -> Result<(), CommonError> {
//!     Err(CommonError::unavailable("introspection service"))
//! }
//!
//! assert!(introspect().unwrap_err().is_unavailable());
//! ```

mod common;

pub use common::CommonError;

/// Result type alias using `CommonError`.
pub type Result<T> = std::result::Result<T, CommonError>;
