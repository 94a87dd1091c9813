//! Inbound operations and strict body parsing.

use std::fmt;

use serde::Deserialize;

use crate::error::ActorError;

/// The operation selected by a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Signup,
    Login,
    Delete,
    Status,
    Unknown(String),
}

impl Operation {
    /// Map a request path to an operation.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/signup" => Operation::Signup,
            "/login" => Operation::Login,
            "/delete" => Operation::Delete,
            "/" => Operation::Status,
            other => Operation::Unknown(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Operation::Signup => "/signup",
            Operation::Login => "/login",
            Operation::Delete => "/delete",
            Operation::Status => "/",
            Operation::Unknown(path) => path,
        }
    }
}

/// A validated username/password pair. Both fields are non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ActorError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ActorError::Validation("username is required".into()));
        }
        if password.is_empty() {
            return Err(ActorError::Validation("password is required".into()));
        }
        Ok(Self { username, password })
    }

    /// Parse a JSON body of the form `{"username": ..., "password": ...}`.
    ///
    /// Unknown fields are ignored. Anything else that is not an object with
    /// two non-empty strings is a validation error.
    pub fn from_json(body: &[u8]) -> Result<Self, ActorError> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            username: Option<String>,
            #[serde(default)]
            password: Option<String>,
        }

        let body: Option<Body> = serde_json::from_slice(body)
            .map_err(|e| ActorError::Validation(format!("malformed body: {e}")))?;
        let body = body.ok_or_else(|| ActorError::Validation("body is null".into()))?;

        Self::new(body.username.unwrap_or_default(), body.password.unwrap_or_default())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body as received, validated lazily by the operation that needs it.
#[derive(Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Json(Vec<u8>),
    Credentials {
        username: String,
        password: String,
    },
}

impl Body {
    /// Validate into credentials.
    pub fn credentials(&self) -> Result<Credentials, ActorError> {
        match self {
            Body::Empty => Err(ActorError::Validation("body is required".into())),
            Body::Json(bytes) => Credentials::from_json(bytes),
            Body::Credentials { username, password } => {
                Credentials::new(username.clone(), password.clone())
            }
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Json(bytes) => write!(f, "Json({} bytes)", bytes.len()),
            Body::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// One operation sent to an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub operation: Operation,
    pub body: Body,
}

impl Request {
    /// Build from a path and an optional raw JSON body.
    pub fn from_parts(path: &str, body: Option<&[u8]>) -> Self {
        Self {
            operation: Operation::from_path(path),
            body: body.map_or(Body::Empty, |b| Body::Json(b.to_vec())),
        }
    }

    pub fn signup(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            operation: Operation::Signup,
            body: Body::Credentials {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            operation: Operation::Login,
            body: Body::Credentials {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    pub fn delete() -> Self {
        Self {
            operation: Operation::Delete,
            body: Body::Empty,
        }
    }

    pub fn status() -> Self {
        Self {
            operation: Operation::Status,
            body: Body::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_from_path() {
        assert_eq!(Operation::from_path("/signup"), Operation::Signup);
        assert_eq!(Operation::from_path("/login"), Operation::Login);
        assert_eq!(Operation::from_path("/delete"), Operation::Delete);
        assert_eq!(Operation::from_path("/"), Operation::Status);
        assert_eq!(
            Operation::from_path("/signup/"),
            Operation::Unknown("/signup/".into())
        );
        assert_eq!(Operation::Unknown("/x".into()).path(), "/x");
    }

    #[test]
    fn test_credentials_from_json() {
        let creds = Credentials::from_json(br#"{"username":"alice","password":"pw","extra":1}"#)
            .unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_credentials_missing_or_empty_fields() {
        for body in [
            &br#"{"username":"alice"}"#[..],
            br#"{"password":"pw"}"#,
            br#"{"username":"","password":"pw"}"#,
            br#"{"username":"alice","password":""}"#,
            br#"{}"#,
        ] {
            assert!(
                matches!(Credentials::from_json(body), Err(ActorError::Validation(_))),
                "accepted {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_credentials_malformed_body() {
        for body in [&b"not json"[..], b"null", b"[]", br#"{"username":1,"password":"pw"}"#] {
            assert!(matches!(
                Credentials::from_json(body),
                Err(ActorError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_empty_body_requires_credentials() {
        assert!(matches!(
            Body::Empty.credentials(),
            Err(ActorError::Validation(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2").unwrap();
        assert!(!format!("{:?}", creds).contains("hunter2"));
        assert!(!format!("{:?}", Request::signup("alice", "hunter2")).contains("hunter2"));
    }
}
