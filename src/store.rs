use serde::{de::DeserializeOwned, Serialize};

use crate::db::KvHandle;

/// Named collections of JSON records and named counters on top of a
/// string key-value store. Every collection is read and written whole.
pub struct RecordStore<K: KvHandle> {
    kv: K,
    namespace: String,
}

impl<K: KvHandle> RecordStore<K> {
    pub fn new(kv: K, namespace: impl Into<String>) -> Self {
        Self {
            kv,
            namespace: namespace.into(),
        }
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}_{}", self.namespace, name)
    }

    /// Missing and unparsable entries both read as an empty collection.
    #[tracing::instrument(skip(self))]
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let raw = match self.kv.get(&self.key(name)) {
            Some(raw) => raw,
            None => return Vec::new(),
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(%err, "collection is corrupt, reading it as empty");
                Vec::new()
            }
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.kv.get(&self.key(name)).is_some()
    }

    /// Overwrites the whole collection. On failure the previous value is
    /// left in place and `false` is returned.
    #[tracing::instrument(skip(self, records), fields(count = records.len()))]
    pub fn save<T: Serialize>(&mut self, name: &str, records: &[T]) -> bool {
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize collection");
                return false;
            }
        };

        match self.kv.set(&self.key(name), &raw) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "failed to save collection");
                false
            }
        }
    }

    /// Current counter value. An absent or unreadable counter is
    /// (re)initialised to `initial`.
    #[tracing::instrument(skip(self))]
    pub fn next_counter(&mut self, name: &str, initial: u64) -> u64 {
        if let Some(value) = self.read_counter(name) {
            return value;
        }

        let key = self.key(name);
        if self.kv.get(&key).is_some() {
            tracing::warn!("counter is unreadable, reinitialising");
        }
        if let Err(err) = self.kv.set(&key, &initial.to_string()) {
            tracing::warn!(%err, "failed to initialise counter");
        }

        initial
    }

    /// Persists counter + 1. Returns `false` if the counter does not exist,
    /// is already at `u64::MAX`, or the write failed.
    #[tracing::instrument(skip(self))]
    pub fn bump_counter(&mut self, name: &str) -> bool {
        let current = match self.read_counter(name) {
            Some(current) => current,
            None => {
                tracing::warn!("bump of an uninitialised counter");
                return false;
            }
        };

        let next = match current.checked_add(1) {
            Some(next) => next,
            None => {
                tracing::warn!(current, "counter exhausted");
                return false;
            }
        };

        match self.kv.set(&self.key(name), &next.to_string()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "failed to bump counter");
                false
            }
        }
    }

    /// Moves a counter forward to `value`. Used when the stored counter
    /// fell behind the records it numbers.
    #[tracing::instrument(skip(self))]
    pub fn set_counter(&mut self, name: &str, value: u64) -> bool {
        match self.kv.set(&self.key(name), &value.to_string()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "failed to set counter");
                false
            }
        }
    }

    /// Removes a collection or counter entry.
    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self, name: &str) -> bool {
        match self.kv.remove(&self.key(name)) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "failed to clear entry");
                false
            }
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_inner(self) -> K {
        self.kv
    }

    fn read_counter(&self, name: &str) -> Option<u64> {
        self.kv.get(&self.key(name))?.trim().parse().ok()
    }
}
