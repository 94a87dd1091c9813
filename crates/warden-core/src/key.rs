//! Composite key encoding.
//!
//! A composite key is the base64 encoding of a fixed 54-byte layout:
//!
//! ```text
//! offset  len  field
//!      0    3  version tag, literal "v01"
//!      3   16  salt
//!     19    3  iteration count, big-endian 24-bit
//!     22   32  derived key
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::KeyError;

/// Version tag of the only supported layout.
pub const KEY_VERSION: &[u8; 3] = b"v01";

pub const VERSION_LEN: usize = 3;
pub const SALT_LEN: usize = 16;
pub const ITERATIONS_LEN: usize = 3;
pub const DERIVED_KEY_LEN: usize = 32;

/// Total decoded length of a composite key.
pub const COMPOSITE_LEN: usize = VERSION_LEN + SALT_LEN + ITERATIONS_LEN + DERIVED_KEY_LEN;

/// Largest iteration count representable in the three-byte field.
pub const MAX_ITERATIONS: u32 = 0x00FF_FFFF;

const SALT_OFFSET: usize = VERSION_LEN;
const ITERATIONS_OFFSET: usize = SALT_OFFSET + SALT_LEN;
const DERIVED_OFFSET: usize = ITERATIONS_OFFSET + ITERATIONS_LEN;

/// Encoded composite key as stored in a credential record.
///
/// The wrapped string is opaque until [`CompositeKey::decode`] is called, so
/// a corrupt stored value surfaces at verification time as
/// [`KeyError::InvalidKey`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Wrap an already-encoded key without checking it.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode into its fields.
    pub fn decode(&self) -> Result<KeyParts, KeyError> {
        KeyParts::decode(&self.0)
    }
}

// Never print key material.
impl fmt::Debug for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompositeKey(..)")
    }
}

/// The decoded fields of a composite key.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyParts {
    pub salt: [u8; SALT_LEN],
    pub iterations: u32,
    pub derived_key: [u8; DERIVED_KEY_LEN],
}

impl KeyParts {
    /// Produce the encoded composite key.
    ///
    /// Fails if `iterations` does not fit in three bytes or is zero.
    pub fn encode(&self) -> Result<CompositeKey, KeyError> {
        let iterations = encode_iterations(self.iterations)?;

        let mut raw = Vec::with_capacity(COMPOSITE_LEN);
        raw.extend_from_slice(KEY_VERSION);
        raw.extend_from_slice(&self.salt);
        raw.extend_from_slice(&iterations);
        raw.extend_from_slice(&self.derived_key);

        Ok(CompositeKey(STANDARD.encode(raw)))
    }

    /// Parse an encoded composite key.
    pub fn decode(encoded: &str) -> Result<Self, KeyError> {
        let raw = STANDARD
            .decode(encoded)
            .map_err(|e| KeyError::InvalidKey(format!("base64: {e}")))?;

        if raw.len() != COMPOSITE_LEN {
            return Err(KeyError::InvalidKey(format!(
                "expected {} bytes, got {}",
                COMPOSITE_LEN,
                raw.len()
            )));
        }

        if &raw[..SALT_OFFSET] != KEY_VERSION {
            return Err(KeyError::InvalidKey("unknown version tag".into()));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&raw[SALT_OFFSET..ITERATIONS_OFFSET]);

        let iterations = decode_iterations(&raw[ITERATIONS_OFFSET..DERIVED_OFFSET]);
        if iterations == 0 {
            return Err(KeyError::InvalidKey("zero iteration count".into()));
        }

        let mut derived_key = [0u8; DERIVED_KEY_LEN];
        derived_key.copy_from_slice(&raw[DERIVED_OFFSET..]);

        Ok(Self {
            salt,
            iterations,
            derived_key,
        })
    }
}

impl fmt::Debug for KeyParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyParts")
            .field("salt", &hex::encode(self.salt))
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

/// Pack an iteration count into three big-endian bytes.
pub fn encode_iterations(iterations: u32) -> Result<[u8; ITERATIONS_LEN], KeyError> {
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(KeyError::InvalidIterations(iterations));
    }
    let [_, hi, mid, lo] = iterations.to_be_bytes();
    Ok([hi, mid, lo])
}

fn decode_iterations(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}
