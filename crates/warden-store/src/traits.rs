//! Store trait: the abstract interface for per-actor persistence.
//!
//! This trait keeps the credential actors storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use warden_core::ActorId;

use crate::error::{Result, StoreError};

/// The Store trait: async interface for keyed, per-actor byte slots.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - Slots of different actors never alias, even when the key is the same.
/// - A successful `put` or `delete` is durable before the future resolves.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value stored under `key` for `actor`.
    async fn get(&self, actor: &ActorId, key: &str) -> Result<Option<Vec<u8>>>;

    /// Insert or replace the value stored under `key` for `actor`.
    async fn put(&self, actor: &ActorId, key: &str, value: &[u8]) -> Result<()>;

    /// Remove the value under `key`.
    ///
    /// Returns whether a value was present.
    async fn delete(&self, actor: &ActorId, key: &str) -> Result<bool>;

    /// List the keys held by `actor`, sorted.
    async fn keys(&self, actor: &ActorId) -> Result<Vec<String>>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get(&self, actor: &ActorId, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(actor, key).await
    }

    async fn put(&self, actor: &ActorId, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(actor, key, value).await
    }

    async fn delete(&self, actor: &ActorId, key: &str) -> Result<bool> {
        (**self).delete(actor, key).await
    }

    async fn keys(&self, actor: &ActorId) -> Result<Vec<String>> {
        (**self).keys(actor).await
    }
}

/// A store handle bound to one actor's namespace.
#[derive(Clone)]
pub struct ActorStorage {
    store: Arc<dyn Store>,
    actor: ActorId,
}

impl ActorStorage {
    pub fn new(store: Arc<dyn Store>, actor: ActorId) -> Self {
        Self { store, actor }
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        self.store.get(&self.actor, key).await
    }

    pub async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        check_key(key)?;
        self.store.put(&self.actor, key, value).await
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        self.store.delete(&self.actor, key).await
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        self.store.keys(&self.actor).await
    }
}

impl std::fmt::Debug for ActorStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorStorage")
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidData("storage key must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use warden_core::IdentityName;

    fn actor(name: &str) -> ActorId {
        IdentityName::new(name).unwrap().actor_id()
    }

    #[tokio::test]
    async fn test_actor_storage_scopes_namespace() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let alice = ActorStorage::new(store.clone(), actor("alice"));
        let bob = ActorStorage::new(store, actor("bob"));

        alice.put("user", b"a").await.unwrap();
        assert_eq!(alice.get("user").await.unwrap(), Some(b"a".to_vec()));
        assert_eq!(bob.get("user").await.unwrap(), None);
        assert_eq!(alice.keys().await.unwrap(), vec!["user".to_string()]);
    }

    #[tokio::test]
    async fn test_actor_storage_rejects_empty_key() {
        let storage = ActorStorage::new(Arc::new(MemoryStore::new()), actor("alice"));
        assert!(matches!(
            storage.put("", b"x").await,
            Err(StoreError::InvalidData(_))
        ));
    }
}
