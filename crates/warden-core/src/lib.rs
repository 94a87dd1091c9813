//! # Warden Core
//!
//! Pure primitives for Warden: identity addressing, credential records, and
//! the password key-derivation protocol.
//!
//! This crate contains no I/O, no storage, no async. It is pure computation
//! over credential data.
//!
//! ## Key Types
//!
//! - [`IdentityName`] - The external, non-empty key of an account
//! - [`ActorId`] - Stable 32-byte address derived from an identity name
//! - [`CredentialRecord`] - The durable per-identity account record
//! - [`CompositeKey`] - Versioned, self-describing encoded password key
//! - [`Pbkdf2Hasher`] - PBKDF2-HMAC-SHA256 implementation of [`CredentialHasher`]
//!
//! ## Key Derivation
//!
//! ```rust
//! use warden_core::kdf;
//!
//! let key = kdf::hash_with_iterations("correct horse", 1_000).unwrap();
//! assert!(kdf::verify(&key, "correct horse").unwrap());
//! assert!(!kdf::verify(&key, "battery staple").unwrap());
//! ```

pub mod error;
pub mod kdf;
pub mod key;
pub mod record;
pub mod types;

pub use error::{CoreError, KeyError};
pub use kdf::{CredentialHasher, Pbkdf2Hasher, DEFAULT_ITERATIONS};
pub use key::{CompositeKey, KeyParts, KEY_VERSION};
pub use record::{ActorState, CredentialRecord, PublicView};
pub use types::{ActorId, IdentityName};
