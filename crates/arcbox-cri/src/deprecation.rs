//! Deprecation warnings and ignore-list filtering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A runtime notice that a feature is scheduled for removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationWarning {
    /// Stable namespaced identifier (e.g. `io.containerd.deprecation/foo`).
    pub id: String,
    /// Human-readable message.
    pub message: String,
    /// When the deprecated behaviour was last observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_occurrence: Option<DateTime<Utc>>,
}

impl DeprecationWarning {
    /// Creates a warning without an occurrence timestamp.
    #[must_use]
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            last_occurrence: None,
        }
    }
}

/// Returns the warnings whose identifier is not in `ignored`.
///
/// Order is preserved and duplicates pass through untouched.
#[must_use]
pub fn filter_deprecations<'a, S: AsRef<str>>(
    raw: &'a [DeprecationWarning],
    ignored: &[S],
) -> Vec<&'a DeprecationWarning> {
    if ignored.is_empty() {
        return raw.iter().collect();
    }

    let ignored: HashSet<&str> = ignored.iter().map(AsRef::as_ref).collect();
    raw.iter()
        .filter(|warning| !ignored.contains(warning.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warnings(ids: &[&str]) -> Vec<DeprecationWarning> {
        ids.iter()
            .map(|id| DeprecationWarning::new(*id, format!("{id} is deprecated")))
            .collect()
    }

    fn ids<'a>(filtered: &[&'a DeprecationWarning]) -> Vec<&'a str> {
        filtered.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn empty_ignore_list_keeps_everything() {
        let raw = warnings(&["a", "b"]);
        let none: [&str; 0] = [];
        assert_eq!(ids(&filter_deprecations(&raw, &none)), vec!["a", "b"]);
    }

    #[test]
    fn ignored_ids_are_removed_in_order() {
        let raw = warnings(&["c", "a", "b", "d"]);
        let filtered = filter_deprecations(&raw, &["a", "d"]);
        assert_eq!(ids(&filtered), vec!["c", "b"]);
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let raw = warnings(&["a", "b", "a"]);
        let filtered = filter_deprecations(&raw, &["b".to_string()]);
        assert_eq!(ids(&filtered), vec!["a", "a"]);
    }

    #[test]
    fn unknown_ignored_ids_are_harmless() {
        let raw = warnings(&["a"]);
        let filtered = filter_deprecations(&raw, &["zzz"]);
        assert_eq!(ids(&filtered), vec!["a"]);
    }

    #[test]
    fn serde_uses_camel_case_and_skips_missing_timestamp() {
        let warning = DeprecationWarning::new("io.containerd.deprecation/foo", "foo");
        let json = serde_json::to_string(&warning).unwrap();
        assert_eq!(json, r#"{"id":"io.containerd.deprecation/foo","message":"foo"}"#);

        let parsed: DeprecationWarning = serde_json::from_str(
            r#"{"id":"x","message":"y","lastOccurrence":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert!(parsed.last_occurrence.is_some());
    }
}
