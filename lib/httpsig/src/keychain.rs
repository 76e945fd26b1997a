use crate::{Algorithm, Key};
use arc_swap::ArcSwap;
use indexmap::{IndexMap, IndexSet};
use std::{fmt, sync::Arc};

type KeyMap = IndexMap<String, Arc<Key>>;

/// Registry of verification keys, indexed by key ID
///
/// Readers work on immutable snapshots and never block. Writers copy the map, patch it and swap it in.
/// A lookup racing a rotation sees either the old or the new key, never a partially updated map.
pub struct Keychain {
    keys: ArcSwap<KeyMap>,
}

impl Keychain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: ArcSwap::from_pointee(KeyMap::new()),
        }
    }

    /// Look up the key registered under the ID
    #[must_use]
    pub fn find(&self, key_id: &str) -> Option<Arc<Key>> {
        self.keys.load().get(key_id).cloned()
    }

    /// Register a key, replacing the key previously registered under the same ID
    ///
    /// Returns the replaced key
    pub fn add(&self, key: Key) -> Option<Arc<Key>> {
        let key = Arc::new(key);
        let previous = self.keys.rcu(|keys| {
            let mut keys = (**keys).clone();
            keys.insert(key.id().to_string(), Arc::clone(&key));
            keys
        });

        debug!(key_id = key.id(), format = ?key.format(), "added key");

        previous.get(key.id()).cloned()
    }

    /// Unregister the key with the ID
    pub fn remove(&self, key_id: &str) -> Option<Arc<Key>> {
        if !self.keys.load().contains_key(key_id) {
            return None;
        }

        let previous = self.keys.rcu(|keys| {
            let mut keys = (**keys).clone();
            keys.shift_remove(key_id);
            keys
        });

        debug!(key_id, "removed key");

        previous.get(key_id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.load().is_empty()
    }

    /// IDs of all registered keys, in insertion order
    #[must_use]
    pub fn key_ids(&self) -> Vec<String> {
        self.keys.load().keys().cloned().collect()
    }

    /// Consistent view of all registered keys, in insertion order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Key>> {
        self.keys.load().values().cloned().collect()
    }

    /// Every algorithm at least one of the registered keys can verify
    #[must_use]
    pub fn algorithms(&self) -> IndexSet<Algorithm> {
        let keys = self.keys.load();
        Algorithm::ALL
            .iter()
            .copied()
            .filter(|algorithm| keys.values().any(|key| key.supports(*algorithm)))
            .collect()
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Key> for Keychain {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        let keys = iter
            .into_iter()
            .map(|key| (key.id().to_string(), Arc::new(key)))
            .collect::<KeyMap>();

        Self {
            keys: ArcSwap::from_pointee(keys),
        }
    }
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keychain")
            .field("key_ids", &self.key_ids())
            .finish()
    }
}
