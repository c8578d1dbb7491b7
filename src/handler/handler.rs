//! Handler: a named unit of business logic with a declared signature.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;

use super::binder::BoundArgs;
use super::signature::Signature;
use crate::error::HandlerError;

/// Result of running a handler body.
pub type HandlerResult = Result<Value, HandlerError>;

type HandlerFn = dyn Fn(BoundArgs) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A handler bound to a route.
///
/// The signature lists, in order, the names the binder resolves against
/// each request. Cloning is cheap; the body is shared.
#[derive(Clone)]
pub struct Handler {
    name: Arc<str>,
    signature: Signature,
    body: Arc<HandlerFn>,
}

impl Handler {
    /// Create a handler from an async body.
    ///
    /// ```ignore
    /// let read = Handler::new("freet.read", &["author?"], |mut args| async move {
    ///     let author: Option<String> = args.take(0)?;
    ///     Ok(json!({ "author": author }))
    /// });
    /// ```
    pub fn new<S, F, Fut>(name: &str, params: &[S], body: F) -> Self
    where
        S: AsRef<str>,
        F: Fn(BoundArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            name: Arc::from(name),
            signature: Signature::parse(params),
            body: Arc::new(move |args| body(args).boxed()),
        }
    }

    /// Create a handler from a synchronous body.
    pub fn sync<S, F>(name: &str, params: &[S], body: F) -> Self
    where
        S: AsRef<str>,
        F: Fn(BoundArgs) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            signature: Signature::parse(params),
            body: Arc::new(move |args| futures::future::ready(body(args)).boxed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Run the body with already bound arguments.
    pub fn call(&self, args: BoundArgs) -> BoxFuture<'static, HandlerResult> {
        (self.body)(args)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Conversion of a handler function's return value into a [`HandlerResult`].
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl<T, E> IntoHandlerResult for Result<T, E>
where
    T: Serialize,
    E: Into<HandlerError>,
{
    fn into_handler_result(self) -> HandlerResult {
        match self {
            Ok(value) => serde_json::to_value(value).map_err(HandlerError::internal),
            Err(e) => Err(e.into()),
        }
    }
}
