//! Error types for Warden.

use thiserror::Error;
use warden_core::{CoreError, KeyError};
use warden_store::StoreError;

use crate::response::Status;

/// Failures of a single actor operation.
///
/// Every variant maps to exactly one response status; none of them escape
/// the actor boundary as a panic or an `Err`.
#[derive(Debug, Error)]
pub enum ActorError {
    /// Missing, empty, or malformed request field.
    #[error("validation error: {0}")]
    Validation(String),

    /// Signup against an identity that already has an account.
    #[error("account already exists")]
    Conflict,

    /// Password did not match the stored key.
    #[error("authentication failed")]
    AuthFailed,

    /// Login against an identity without an account.
    #[error("no account for this identity")]
    AccountAbsent,

    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// The stored credential could not be decoded.
    #[error("invalid stored key: {0}")]
    InvalidKey(String),

    /// Storage, hashing, or task failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ActorError {
    /// Response status for this error.
    ///
    /// `AccountAbsent` answers 405 rather than 404, so a login probe cannot
    /// tell "no account" apart from other refused methods. `InvalidKey` is a
    /// server-side fault and answers 500, never 401.
    pub fn status(&self) -> Status {
        match self {
            ActorError::Validation(_) => Status::BadRequest,
            ActorError::Conflict | ActorError::AccountAbsent => Status::MethodNotAllowed,
            ActorError::AuthFailed => Status::Unauthorized,
            ActorError::UnknownRoute(_) => Status::NotFound,
            ActorError::InvalidKey(_) | ActorError::Internal(_) => Status::Internal,
        }
    }

    /// Whether this error indicates a fault rather than a refused request.
    pub fn is_fault(&self) -> bool {
        self.status() == Status::Internal
    }
}

impl From<KeyError> for ActorError {
    fn from(e: KeyError) -> Self {
        match e {
            KeyError::InvalidKey(msg) => ActorError::InvalidKey(msg),
            other => ActorError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ActorError {
    fn from(e: StoreError) -> Self {
        ActorError::Internal(e.to_string())
    }
}

impl From<CoreError> for ActorError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Key(key) => key.into(),
            other => ActorError::Internal(other.to_string()),
        }
    }
}

/// Errors from setting up or managing actors.
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("identity error: {0}")]
    Identity(#[from] CoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for Warden setup operations.
pub type Result<T> = std::result::Result<T, WardenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ActorError::Validation("x".into()).status().code(), 400);
        assert_eq!(ActorError::Conflict.status().code(), 405);
        assert_eq!(ActorError::AuthFailed.status().code(), 401);
        assert_eq!(ActorError::AccountAbsent.status().code(), 405);
        assert_eq!(ActorError::UnknownRoute("/x".into()).status().code(), 404);
        assert_eq!(ActorError::InvalidKey("x".into()).status().code(), 500);
        assert_eq!(ActorError::Internal("x".into()).status().code(), 500);
    }

    #[test]
    fn test_invalid_key_not_conflated_with_auth_failure() {
        let err: ActorError = KeyError::InvalidKey("bad".into()).into();
        assert!(matches!(err, ActorError::InvalidKey(_)));
        assert!(err.is_fault());

        let err: ActorError = KeyError::Rng("no entropy".into()).into();
        assert!(matches!(err, ActorError::Internal(_)));
    }
}
