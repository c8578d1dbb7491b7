//! Invocation of one handler for one request.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::HandlerError;
use crate::handler::{bind, Handler, HandlerResult, RequestContext};

/// Body message sent for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Body message sent when no route matches.
pub const NOT_FOUND_MESSAGE: &str = "Page not found";

/// How an invocation ended.
#[derive(Debug)]
pub enum Outcome {
    Succeeded(Value),
    FailedTyped { status: u16, message: String },
    FailedInternal,
}

impl Outcome {
    fn from_result(handler: &Handler, result: HandlerResult) -> Self {
        match result {
            Ok(value) => Outcome::Succeeded(value),
            Err(err) => match err.client_message() {
                Some(message) => {
                    debug!(handler = handler.name(), error = %err, "handler rejected request");
                    Outcome::FailedTyped {
                        status: err.status_code(),
                        message: message.to_string(),
                    }
                }
                None => {
                    error!(handler = handler.name(), error = %err, "handler failed");
                    Outcome::FailedInternal
                }
            },
        }
    }

    fn from_panic(handler: &Handler, panic: Box<dyn Any + Send>) -> Self {
        let cause = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(handler = handler.name(), panic = %cause, "handler panicked");
        Outcome::FailedInternal
    }
}

/// The response written for one request: a status code and a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// JSON response body.
    pub body: Value,
}

impl Reply {
    /// A 200 reply carrying `body`.
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// A failure reply: `status` plus `{"message": message}`.
    pub fn message(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "message": message }),
        }
    }

    pub fn not_found() -> Self {
        Self::message(404, NOT_FOUND_MESSAGE)
    }

    pub fn internal_error() -> Self {
        Self::message(500, INTERNAL_ERROR_MESSAGE)
    }

    /// Reply for an error raised outside a handler body (bad request body
    /// and the like). Internal detail is dropped.
    pub fn from_error(err: &HandlerError) -> Self {
        match err.client_message() {
            Some(message) => Self::message(err.status_code(), message),
            None => Self::internal_error(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<Outcome> for Reply {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Succeeded(value) => Reply::ok(value),
            Outcome::FailedTyped { status, message } => Reply::message(status, &message),
            Outcome::FailedInternal => Reply::internal_error(),
        }
    }
}

/// Bind, run and translate one handler call.
///
/// The handler runs to completion before the reply is built. A typed
/// failure is passed through with its status and message. Any other error,
/// and a panic inside the handler, is logged and becomes an opaque 500.
/// Exactly one [`Reply`] comes out whichever way the call ends.
pub async fn invoke(handler: &Handler, ctx: RequestContext) -> Reply {
    let args = bind(handler.signature(), &ctx);
    debug!(handler = handler.name(), args = args.len(), "arguments bound");

    // Call inside the future so a panic while building it is caught too.
    let call = async { handler.call(args).await };
    let outcome = match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => Outcome::from_result(handler, result),
        Err(panic) => Outcome::from_panic(handler, panic),
    };
    Reply::from(outcome)
}
