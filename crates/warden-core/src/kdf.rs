//! Password key derivation.
//!
//! PBKDF2-HMAC-SHA256 with a random 16-byte salt and a 256-bit output,
//! packed into a [`CompositeKey`]. Verification re-derives with the stored
//! salt and iteration count and compares in constant time.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::KeyError;
use crate::key::{CompositeKey, KeyParts, DERIVED_KEY_LEN, MAX_ITERATIONS, SALT_LEN};

/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Hash a password with [`DEFAULT_ITERATIONS`].
pub fn hash(password: &str) -> Result<CompositeKey, KeyError> {
    hash_with_iterations(password, DEFAULT_ITERATIONS)
}

/// Hash a password with an explicit iteration count.
pub fn hash_with_iterations(password: &str, iterations: u32) -> Result<CompositeKey, KeyError> {
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(KeyError::InvalidIterations(iterations));
    }

    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| KeyError::Rng(e.to_string()))?;

    let derived_key = derive(password, &salt, iterations);

    KeyParts {
        salt,
        iterations,
        derived_key,
    }
    .encode()
}

/// Check a password against a stored composite key.
///
/// Returns `Err(KeyError::InvalidKey)` if the key cannot be decoded; a wrong
/// password is `Ok(false)`.
pub fn verify(stored: &CompositeKey, password: &str) -> Result<bool, KeyError> {
    let parts = stored.decode()?;
    let candidate = derive(password, &parts.salt, parts.iterations);
    Ok(bool::from(candidate[..].ct_eq(&parts.derived_key[..])))
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; DERIVED_KEY_LEN] {
    let mut out = [0u8; DERIVED_KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Pluggable password hashing, used by the credential actor.
///
/// Implementations must be cheap to share across tasks; hashing is run on a
/// blocking thread by the caller.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Produce a composite key for a new password.
    fn hash(&self, password: &str) -> Result<CompositeKey, KeyError>;

    /// Check a password against a stored key.
    fn verify(&self, stored: &CompositeKey, password: &str) -> Result<bool, KeyError>;
}

/// The production hasher: PBKDF2-HMAC-SHA256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Hasher {
    iterations: u32,
}

impl Pbkdf2Hasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl CredentialHasher for Pbkdf2Hasher {
    fn hash(&self, password: &str) -> Result<CompositeKey, KeyError> {
        hash_with_iterations(password, self.iterations)
    }

    // The stored key carries its own iteration count.
    fn verify(&self, stored: &CompositeKey, password: &str) -> Result<bool, KeyError> {
        verify(stored, password)
    }
}
