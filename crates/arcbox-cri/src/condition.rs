//! Runtime conditions.
//!
//! A condition is a named boolean health signal. `status == true` means
//! healthy, in which case `reason` and `message` are both empty strings.

use crate::deprecation::{DeprecationWarning, filter_deprecations};
use crate::error::{CriError, Result};
use arcbox_constants::status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Condition type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    /// Runtime is up and serving requests.
    RuntimeReady,
    /// Pod network plugin is initialized.
    NetworkReady,
    /// No deprecation warnings remain after the ignore list.
    ContainerdHasNoDeprecationWarnings,
}

impl ConditionType {
    /// Returns the wire name of the condition type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RuntimeReady => status::RUNTIME_READY,
            Self::NetworkReady => status::NETWORK_READY,
            Self::ContainerdHasNoDeprecationWarnings => status::NO_DEPRECATION_WARNINGS,
        }
    }
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeCondition {
    /// Condition type.
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    /// True when the condition is healthy.
    pub status: bool,
    /// Machine-readable reason. Empty when healthy.
    pub reason: String,
    /// Human-readable detail. Empty when healthy.
    pub message: String,
}

impl RuntimeCondition {
    /// Creates a healthy condition.
    #[must_use]
    pub const fn healthy(condition_type: ConditionType) -> Self {
        Self {
            condition_type,
            status: true,
            reason: String::new(),
            message: String::new(),
        }
    }

    /// Creates an unhealthy condition.
    #[must_use]
    pub fn unhealthy(
        condition_type: ConditionType,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            condition_type,
            status: false,
            reason: reason.into(),
            message: message.into(),
        }
    }

    /// Returns true if the condition is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.status
    }
}

/// Builds the `RuntimeReady` and `NetworkReady` conditions, in that order.
#[must_use]
pub fn readiness_conditions(network_ready: bool, runtime_ready: bool) -> Vec<RuntimeCondition> {
    let runtime = if runtime_ready {
        RuntimeCondition::healthy(ConditionType::RuntimeReady)
    } else {
        RuntimeCondition::unhealthy(ConditionType::RuntimeReady, status::RUNTIME_NOT_READY, "")
    };
    let network = if network_ready {
        RuntimeCondition::healthy(ConditionType::NetworkReady)
    } else {
        RuntimeCondition::unhealthy(ConditionType::NetworkReady, status::NETWORK_NOT_READY, "")
    };
    vec![runtime, network]
}

/// Builds the `ContainerdHasNoDeprecationWarnings` condition.
///
/// Warnings whose id is in `ignored` are dropped first. If any remain the
/// condition is unhealthy and its message is a JSON object mapping each id
/// to its message. Keys are sorted lexicographically and a repeated id keeps
/// the message of its last occurrence.
///
/// # Errors
///
/// Returns [`CriError::Serialization`] if the mapping cannot be encoded.
pub fn deprecation_condition<S: AsRef<str>>(
    raw: &[DeprecationWarning],
    ignored: &[S],
) -> Result<RuntimeCondition> {
    let active = filter_deprecations(raw, ignored);
    if active.is_empty() {
        return Ok(RuntimeCondition::healthy(
            ConditionType::ContainerdHasNoDeprecationWarnings,
        ));
    }

    let messages: BTreeMap<&str, &str> = active
        .iter()
        .map(|warning| (warning.id.as_str(), warning.message.as_str()))
        .collect();
    let message = serde_json::to_string(&messages)
        .map_err(|e| CriError::serialization("deprecation warnings", e))?;

    Ok(RuntimeCondition::unhealthy(
        ConditionType::ContainerdHasNoDeprecationWarnings,
        status::HAS_DEPRECATION_WARNINGS,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOO: &str = "io.containerd.deprecation/foo";

    fn foo() -> Vec<DeprecationWarning> {
        vec![DeprecationWarning::new(FOO, "foo")]
    }

    #[test]
    fn active_warning_makes_condition_unhealthy() {
        let none: [&str; 0] = [];
        let cond = deprecation_condition(&foo(), &none).unwrap();
        assert_eq!(
            cond,
            RuntimeCondition {
                condition_type: ConditionType::ContainerdHasNoDeprecationWarnings,
                status: false,
                reason: "ContainerdHasDeprecationWarnings".to_string(),
                message: r#"{"io.containerd.deprecation/foo":"foo"}"#.to_string(),
            }
        );
    }

    #[test]
    fn ignored_warning_makes_condition_healthy() {
        let cond = deprecation_condition(&foo(), &[FOO]).unwrap();
        assert_eq!(
            cond,
            RuntimeCondition {
                condition_type: ConditionType::ContainerdHasNoDeprecationWarnings,
                status: true,
                reason: String::new(),
                message: String::new(),
            }
        );
    }

    #[test]
    fn message_keys_are_sorted() {
        let raw = vec![
            DeprecationWarning::new("io.containerd.deprecation/zeta", "z"),
            DeprecationWarning::new("io.containerd.deprecation/alpha", "a"),
            DeprecationWarning::new("io.containerd.deprecation/mid", "m"),
        ];
        let none: [&str; 0] = [];
        let cond = deprecation_condition(&raw, &none).unwrap();
        assert_eq!(
            cond.message,
            concat!(
                r#"{"io.containerd.deprecation/alpha":"a","#,
                r#""io.containerd.deprecation/mid":"m","#,
                r#""io.containerd.deprecation/zeta":"z"}"#
            )
        );
    }

    #[test]
    fn repeated_id_keeps_last_message() {
        let raw = vec![
            DeprecationWarning::new(FOO, "first"),
            DeprecationWarning::new(FOO, "second"),
        ];
        let none: [&str; 0] = [];
        let cond = deprecation_condition(&raw, &none).unwrap();
        assert_eq!(cond.message, r#"{"io.containerd.deprecation/foo":"second"}"#);
    }

    #[test]
    fn partially_ignored_list_reports_only_survivors() {
        let raw = vec![
            DeprecationWarning::new("a", "1"),
            DeprecationWarning::new("b", "2"),
        ];
        let cond = deprecation_condition(&raw, &["a"]).unwrap();
        assert!(!cond.is_healthy());
        let parsed: BTreeMap<String, String> = serde_json::from_str(&cond.message).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["b"], "2");
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let raw = vec![
            DeprecationWarning::new("b", "2"),
            DeprecationWarning::new("a", "1"),
        ];
        let none: [&str; 0] = [];
        let first = serde_json::to_vec(&deprecation_condition(&raw, &none).unwrap()).unwrap();
        let second = serde_json::to_vec(&deprecation_condition(&raw, &none).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn readiness_conditions_follow_flags() {
        let conditions = readiness_conditions(true, true);
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].condition_type, ConditionType::RuntimeReady);
        assert_eq!(conditions[1].condition_type, ConditionType::NetworkReady);
        assert!(conditions.iter().all(RuntimeCondition::is_healthy));
        assert!(conditions.iter().all(|c| c.reason.is_empty() && c.message.is_empty()));

        let conditions = readiness_conditions(false, true);
        assert!(conditions[0].is_healthy());
        assert!(!conditions[1].is_healthy());
        assert_eq!(conditions[1].reason, "NetworkPluginNotReady");
        assert!(conditions[1].message.is_empty());

        let conditions = readiness_conditions(true, false);
        assert_eq!(conditions[0].reason, "RuntimeNotReady");
    }

    #[test]
    fn condition_type_serializes_as_wire_name() {
        for ty in [
            ConditionType::RuntimeReady,
            ConditionType::NetworkReady,
            ConditionType::ContainerdHasNoDeprecationWarnings,
        ] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }

        let json = serde_json::to_string(&RuntimeCondition::healthy(ConditionType::NetworkReady))
            .unwrap();
        assert_eq!(
            json,
            r#"{"type":"NetworkReady","status":true,"reason":"","message":""}"#
        );
    }
}
