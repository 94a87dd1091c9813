//! Error types for Warden Core.

use thiserror::Error;

/// Errors produced by the key-derivation protocol.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The stored key could not be decoded, has the wrong length, or carries
    /// an unknown version tag.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("iteration count {0} does not fit in three bytes")]
    InvalidIterations(u32),

    /// The operating system RNG could not produce a salt.
    #[error("random source failure: {0}")]
    Rng(String),

    /// Derivation failed. PBKDF2 itself cannot fail; other
    /// [`CredentialHasher`](crate::CredentialHasher) implementations may.
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Errors for identity and record handling.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("identity name must not be empty")]
    EmptyIdentity,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Key(#[from] KeyError),
}
