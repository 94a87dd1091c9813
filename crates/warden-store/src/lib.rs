//! # Warden Store
//!
//! Durable storage for credential actors. Every actor owns a private
//! namespace of keyed byte slots, addressed by its [`ActorId`].
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`ActorStorage`] - A store scoped to a single actor
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden_core::IdentityName;
//! use warden_store::{ActorStorage, SqliteStore};
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("warden.db").unwrap());
//!     let alice = IdentityName::new("alice").unwrap();
//!
//!     let storage = ActorStorage::new(store, alice.actor_id());
//!     storage.put("user", b"{}").await.unwrap();
//!     assert!(storage.get("user").await.unwrap().is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Confirmed writes**: `put` and `delete` return only once the write is
//!   durable for the backend in use.
//! - **Idempotent deletes**: deleting an absent key is not an error.
//!
//! [`ActorId`]: warden_core::ActorId

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ActorStorage, Store};
