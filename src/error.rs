//! Error types for handlers and route registration.

use std::error::Error;
use std::fmt;
use std::ops::RangeInclusive;

use tracing::warn;

use crate::router::Method;

/// Status codes a typed failure may carry. Anything else is sent as 500.
pub const FAILURE_STATUS_RANGE: RangeInclusive<u16> = 400..=599;

/// Error returned by a handler body.
///
/// Every variant except [`HandlerError::Internal`] is a *typed failure*:
/// a deliberate, client-addressable problem whose status code and message
/// are safe to send back verbatim. `Internal` is a defect or an unhandled
/// downstream fault. Its detail is logged and never shown to the caller.
#[derive(Debug)]
pub enum HandlerError {
    /// Input was missing or malformed.
    BadValues(String),
    /// No user in the session, or the credentials were wrong.
    Unauthenticated(String),
    /// The user is known but may not do this.
    NotAllowed(String),
    /// The referenced resource does not exist.
    NotFound(String),
    /// The request conflicts with existing state.
    Conflict(String),
    /// Any other deliberate failure with an explicit status code.
    Status { code: u16, message: String },
    /// Unexpected failure.
    Internal(Box<dyn Error + Send + Sync>),
}

impl HandlerError {
    /// A typed failure with an explicit status code.
    ///
    /// `code` must be a 4xx or 5xx code; any other code is answered
    /// with 500, keeping the message.
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        if !FAILURE_STATUS_RANGE.contains(&code) {
            warn!(code, "typed failure with a non-failure status code, sending 500");
        }
        HandlerError::Status {
            code,
            message: message.into(),
        }
    }

    /// Wrap an unexpected failure.
    pub fn internal(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        HandlerError::Internal(err.into())
    }

    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::BadValues(_) => 400,
            HandlerError::Unauthenticated(_) => 401,
            HandlerError::NotAllowed(_) => 403,
            HandlerError::NotFound(_) => 404,
            HandlerError::Conflict(_) => 409,
            HandlerError::Status { code, .. } if FAILURE_STATUS_RANGE.contains(code) => *code,
            HandlerError::Status { .. } => 500,
            HandlerError::Internal(_) => 500,
        }
    }

    /// `true` for deliberate failures that may be shown to the caller.
    pub fn is_typed(&self) -> bool {
        !matches!(self, HandlerError::Internal(_))
    }

    /// The message a caller may see. `None` for internal failures.
    pub fn client_message(&self) -> Option<&str> {
        match self {
            HandlerError::BadValues(msg)
            | HandlerError::Unauthenticated(msg)
            | HandlerError::NotAllowed(msg)
            | HandlerError::NotFound(msg)
            | HandlerError::Conflict(msg) => Some(msg),
            HandlerError::Status { message, .. } => Some(message),
            HandlerError::Internal(_) => None,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::BadValues(msg) => write!(f, "bad values: {}", msg),
            HandlerError::Unauthenticated(msg) => write!(f, "unauthenticated: {}", msg),
            HandlerError::NotAllowed(msg) => write!(f, "not allowed: {}", msg),
            HandlerError::NotFound(msg) => write!(f, "not found: {}", msg),
            HandlerError::Conflict(msg) => write!(f, "conflict: {}", msg),
            HandlerError::Status { code, message } => write!(f, "status {}: {}", code, message),
            HandlerError::Internal(e) => write!(f, "internal error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::BadValues(err.to_string())
    }
}

/// Error raised while building the route table at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A route with the same method and path shape is already registered.
    DuplicateRoute { method: Method, path: String },
    /// The path pattern could not be parsed.
    InvalidPath { path: String, reason: &'static str },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::DuplicateRoute { method, path } => {
                write!(f, "route {} {} is already registered", method, path)
            }
            RouteError::InvalidPath { path, reason } => {
                write!(f, "invalid route path {:?}: {}", path, reason)
            }
        }
    }
}

impl Error for RouteError {}
