//! Credential records and actor state.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::key::CompositeKey;

/// The durable account record of one identity.
///
/// Stored as JSON with the field names `id`, `username` and `hashedPassword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: String,
    pub username: String,
    pub hashed_password: CompositeKey,
}

impl CredentialRecord {
    pub fn new(id: impl Into<String>, username: impl Into<String>, hashed_password: CompositeKey) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            hashed_password,
        }
    }

    /// The record without its password key.
    pub fn public_view(&self) -> PublicView {
        PublicView {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }

    /// Encode for the storage slot.
    pub fn to_json(&self) -> Result<Vec<u8>, CoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from the storage slot.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// What callers get back: the record stripped of `hashedPassword`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicView {
    pub id: String,
    pub username: String,
}

/// In-memory state owned by a credential actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorState {
    /// Whether the durable load has completed.
    pub loaded: bool,
    pub record: Option<CredentialRecord>,
}

impl ActorState {
    /// A freshly created, not yet loaded state.
    pub fn new() -> Self {
        Self::default()
    }

    /// State after a completed load.
    pub fn loaded(record: Option<CredentialRecord>) -> Self {
        Self {
            loaded: true,
            record,
        }
    }

    pub fn is_present(&self) -> bool {
        self.record.is_some()
    }

    pub fn public_view(&self) -> Option<PublicView> {
        self.record.as_ref().map(CredentialRecord::public_view)
    }
}
