//! Actor responses: a status code plus a JSON body that may be `null`.

use serde_json::Value;
use warden_core::PublicView;

use crate::error::ActorError;

/// The status codes an actor can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    MethodNotAllowed,
    Internal,
}

impl Status {
    /// HTTP status code.
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::Internal => 500,
        }
    }
}

/// The reply to one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub body: Option<PublicView>,
}

impl Response {
    /// 200 with the account's public view.
    pub fn ok(view: PublicView) -> Self {
        Self {
            status: Status::Ok,
            body: Some(view),
        }
    }

    /// 404 with a `null` body.
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            body: None,
        }
    }

    /// Bodyless response for a failed operation. Error detail is not leaked.
    pub fn from_error(error: &ActorError) -> Self {
        Self {
            status: error.status(),
            body: None,
        }
    }

    pub fn code(&self) -> u16 {
        self.status.code()
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// The body as a JSON value: the public view object or `null`.
    pub fn to_json(&self) -> Value {
        match &self.body {
            Some(view) => serde_json::json!({
                "id": view.id,
                "username": view.username,
            }),
            None => Value::Null,
        }
    }
}

impl From<ActorError> for Response {
    fn from(error: ActorError) -> Self {
        Response::from_error(&error)
    }
}
