//! Image pinning collaborator.
//!
//! Pins map a logical name (such as `"sandbox"`) to a concrete image
//! reference that must not be garbage collected.

use arcbox_error::{CommonError, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared pin lookup trait object.
pub type DynPinnedImages = Arc<dyn PinnedImages>;

/// Lookup of pinned images by logical name.
pub trait PinnedImages: Send + Sync {
    /// Returns the image pinned under `key`, if any.
    fn pinned_image(&self, key: &str) -> Option<String>;
}

/// In-memory pinned image store.
#[derive(Debug, Default)]
pub struct PinnedImageStore {
    pins: RwLock<HashMap<String, String>>,
}

impl PinnedImageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `pins`.
    #[must_use]
    pub fn with_pins<K, V>(pins: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pins = pins
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            pins: RwLock::new(pins),
        }
    }

    /// Pins `image` under `key`, replacing any previous pin.
    ///
    /// Returns the previously pinned image.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or image is empty, or the store lock is poisoned.
    pub fn pin(&self, key: impl Into<String>, image: impl Into<String>) -> Result<Option<String>> {
        let key = key.into();
        let image = image.into();
        if key.is_empty() || image.is_empty() {
            return Err(CommonError::config("pin key and image must not be empty"));
        }

        let previous = self
            .pins
            .write()
            .map_err(|_| CommonError::internal("pin store lock poisoned"))?
            .insert(key.clone(), image.clone());

        info!(key = %key, image = %image, "pinned image");
        Ok(previous)
    }

    /// Removes the pin under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is pinned under `key`, or the store lock is poisoned.
    pub fn unpin(&self, key: &str) -> Result<String> {
        let image = self
            .pins
            .write()
            .map_err(|_| CommonError::internal("pin store lock poisoned"))?
            .remove(key)
            .ok_or_else(|| CommonError::not_found(format!("pinned image {key}")))?;

        info!(key = %key, image = %image, "unpinned image");
        Ok(image)
    }

    /// Returns the image pinned under `key`.
    #[must_use]
    pub fn pinned(&self, key: &str) -> Option<String> {
        self.pins.read().ok()?.get(key).cloned()
    }

    /// Lists all pins ordered by key.
    #[must_use]
    pub fn list(&self) -> BTreeMap<String, String> {
        self.pins
            .read()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}

impl PinnedImages for PinnedImageStore {
    fn pinned_image(&self, key: &str) -> Option<String> {
        self.pinned(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_lookup_and_unpin() {
        let store = PinnedImageStore::new();
        assert_eq!(store.pinned_image("sandbox"), None);

        assert_eq!(store.pin("sandbox", "registry.k8s.io/pause:3.9").unwrap(), None);
        assert_eq!(
            store.pin("sandbox", "registry.k8s.io/pause:3.10").unwrap(),
            Some("registry.k8s.io/pause:3.9".to_string())
        );
        assert_eq!(
            store.pinned_image("sandbox").as_deref(),
            Some("registry.k8s.io/pause:3.10")
        );

        assert_eq!(store.unpin("sandbox").unwrap(), "registry.k8s.io/pause:3.10");
        assert!(store.unpin("sandbox").unwrap_err().is_not_found());
    }

    #[test]
    fn empty_pins_are_rejected() {
        let store = PinnedImageStore::new();
        assert!(store.pin("", "img").is_err());
        assert!(store.pin("sandbox", "").is_err());
        assert!(store.list().is_empty());
    }

    #[test]
    fn seeded_pins_are_listed_in_key_order() {
        let store = PinnedImageStore::with_pins([("sandbox", "pause:1"), ("agent", "agent:2")]);
        let keys: Vec<_> = store.list().into_keys().collect();
        assert_eq!(keys, vec!["agent", "sandbox"]);
    }
}
