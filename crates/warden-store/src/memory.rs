//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence across processes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use warden_core::ActorId;

use crate::error::{Result, StoreError};
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<ActorId, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actors holding at least one slot.
    pub fn actor_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<ActorId, BTreeMap<String, Vec<u8>>>>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<ActorId, BTreeMap<String, Vec<u8>>>>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, actor: &ActorId, key: &str) -> Result<Option<Vec<u8>>> {
        let inner = self.read()?;
        Ok(inner.get(actor).and_then(|slots| slots.get(key)).cloned())
    }

    async fn put(&self, actor: &ActorId, key: &str, value: &[u8]) -> Result<()> {
        let mut inner = self.write()?;
        inner
            .entry(*actor)
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, actor: &ActorId, key: &str) -> Result<bool> {
        let mut inner = self.write()?;
        let Some(slots) = inner.get_mut(actor) else {
            return Ok(false);
        };
        let removed = slots.remove(key).is_some();
        if slots.is_empty() {
            inner.remove(actor);
        }
        Ok(removed)
    }

    async fn keys(&self, actor: &ActorId) -> Result<Vec<String>> {
        let inner = self.read()?;
        Ok(inner
            .get(actor)
            .map(|slots| slots.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::IdentityName;

    fn actor(name: &str) -> ActorId {
        IdentityName::new(name).unwrap().actor_id()
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let alice = actor("alice");

        assert_eq!(store.get(&alice, "user").await.unwrap(), None);

        store.put(&alice, "user", b"v1").await.unwrap();
        assert_eq!(store.get(&alice, "user").await.unwrap(), Some(b"v1".to_vec()));

        // Overwrite
        store.put(&alice, "user", b"v2").await.unwrap();
        assert_eq!(store.get(&alice, "user").await.unwrap(), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_memory_store_delete_idempotent() {
        let store = MemoryStore::new();
        let alice = actor("alice");

        store.put(&alice, "user", b"v1").await.unwrap();
        assert!(store.delete(&alice, "user").await.unwrap());
        assert!(!store.delete(&alice, "user").await.unwrap());
        assert_eq!(store.get(&alice, "user").await.unwrap(), None);
        assert_eq!(store.actor_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_keys_sorted() {
        let store = MemoryStore::new();
        let alice = actor("alice");

        store.put(&alice, "user", b"1").await.unwrap();
        store.put(&alice, "meta", b"2").await.unwrap();
        assert_eq!(store.keys(&alice).await.unwrap(), vec!["meta", "user"]);
        assert!(store.keys(&actor("bob")).await.unwrap().is_empty());
    }
}
