//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for Warden. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use warden_core::ActorId;

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::Store;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, actor: &ActorId, key: &str) -> Result<Option<Vec<u8>>> {
        let actor = *actor;
        let key = key.to_string();

        self.with_conn(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM actor_slots WHERE actor_id = ?1 AND slot_key = ?2",
                    params![actor.as_bytes().as_slice(), key],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn put(&self, actor: &ActorId, key: &str, value: &[u8]) -> Result<()> {
        let actor = *actor;
        let key = key.to_string();
        let value = value.to_vec();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO actor_slots (actor_id, slot_key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(actor_id, slot_key)
                 DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![actor.as_bytes().as_slice(), key, value, now_millis()],
            )?;
            tracing::trace!(actor = %actor, key = %key, "slot written");
            Ok(())
        })
        .await
    }

    async fn delete(&self, actor: &ActorId, key: &str) -> Result<bool> {
        let actor = *actor;
        let key = key.to_string();

        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM actor_slots WHERE actor_id = ?1 AND slot_key = ?2",
                params![actor.as_bytes().as_slice(), key],
            )?;
            Ok(removed > 0)
        })
        .await
    }

    async fn keys(&self, actor: &ActorId) -> Result<Vec<String>> {
        let actor = *actor;

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT slot_key FROM actor_slots WHERE actor_id = ?1 ORDER BY slot_key",
            )?;
            let keys = stmt
                .query_map(params![actor.as_bytes().as_slice()], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(keys)
        })
        .await
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
    async fn test_sqlite_put_get_delete() {
        let store = SqliteStore::open_memory().unwrap();
        let alice = actor("alice");

        assert_eq!(store.get(&alice, "user").await.unwrap(), None);

        store.put(&alice, "user", b"v1").await.unwrap();
        store.put(&alice, "user", b"v2").await.unwrap();
        assert_eq!(store.get(&alice, "user").await.unwrap(), Some(b"v2".to_vec()));

        assert!(store.delete(&alice, "user").await.unwrap());
        assert!(!store.delete(&alice, "user").await.unwrap());
        assert_eq!(store.get(&alice, "user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_actor_isolation() {
        let store = SqliteStore::open_memory().unwrap();

        store.put(&actor("alice"), "user", b"a").await.unwrap();
        store.put(&actor("bob"), "user", b"b").await.unwrap();
        store.put(&actor("bob"), "extra", b"c").await.unwrap();

        assert_eq!(store.get(&actor("alice"), "user").await.unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.keys(&actor("bob")).await.unwrap(), vec!["extra", "user"]);
        assert_eq!(store.keys(&actor("alice")).await.unwrap(), vec!["user"]);
    }

    #[tokio::test]
    async fn test_sqlite_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.db");
        let alice = actor("alice");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put(&alice, "user", b"persisted").await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get(&alice, "user").await.unwrap(),
            Some(b"persisted".to_vec())
        );
    }
}
