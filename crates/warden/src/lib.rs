//! # Warden
//!
//! Per-identity credential actors: each identity name is owned by exactly one
//! sequential actor that creates, verifies and deletes its account record.
//!
//! ## Overview
//!
//! - **Directory**: resolves a name to the one actor owning it
//! - **Actor**: loads the record before serving, persists before responding
//! - **Key derivation**: PBKDF2-HMAC-SHA256 composite keys, see [`core::kdf`]
//! - **Storage**: any [`store::Store`], SQLite or in-memory
//!
//! ## Usage
//!
//! ```rust,no_run
//! use warden::{ActorDirectory, WardenConfig};
//! use warden::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("warden.db").unwrap();
//!     let directory = ActorDirectory::new(store, WardenConfig::default()).unwrap();
//!
//!     let alice = directory.resolve_name("alice").await.unwrap();
//!     let response = alice.signup("alice", "secret1").await;
//!     assert_eq!(response.code(), 200);
//!
//!     let response = alice
//!         .fetch("/login", Some(br#"{"username":"alice","password":"secret1"}"#))
//!         .await;
//!     println!("{} {}", response.code(), response.to_json());
//! }
//! ```
//!
//! ## Responses
//!
//! | Operation | Success | Failure |
//! |---|---|---|
//! | `/signup` | 200 `{id, username}` | 400, 405 (exists), 500 |
//! | `/login` | 200 `{id, username}` | 400, 401, 405 (no account), 500 |
//! | `/delete` | 404 `null` | 500 |
//! | `/` | 200 `{id, username}` | 404 `null` |
//! | other | | 404 `null` |

pub mod actor;
pub mod config;
pub mod directory;
pub mod error;
pub mod request;
pub mod response;

// Re-export component crates
pub use warden_core as core;
pub use warden_store as store;

pub use actor::{ActorHandle, CredentialActor, USER_KEY};
pub use config::WardenConfig;
pub use directory::ActorDirectory;
pub use error::{ActorError, Result, WardenError};
pub use request::{Body, Credentials, Operation, Request};
pub use response::{Response, Status};

pub use warden_core::{
    ActorId, ActorState, CompositeKey, CredentialHasher, CredentialRecord, IdentityName,
    Pbkdf2Hasher, PublicView,
};
