//! concept_router: bind request data to handler parameters by name.
//!
//! Handlers are plain functions whose parameter names say where their
//! arguments come from. For each request the binder looks every name up in
//! the path parameters, then the query string, then the body. The reserved
//! names `session`, `query`, `body` and `params` receive the whole source.
//! The dispatcher runs the handler and turns its result into one JSON reply.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use concept_router::{handler, http, ConceptRouter, HandlerError, RouteTable, Session};
//! use serde_json::{json, Value};
//!
//! #[handler]
//! async fn create(session: Session, content: String) -> Result<Value, HandlerError> {
//!     let author = session.require_user()?;
//!     Ok(json!({ "msg": "Freet created!", "freet": { "author": author, "content": content } }))
//! }
//!
//! let mut freets = ConceptRouter::new("freets");
//! freets.post("/", create_handler())?;
//!
//! let mut table = RouteTable::new();
//! table.mount_concept(freets)?;           // POST /api/freets
//!
//! http::serve(Arc::new(table), "0.0.0.0:3000").await?;
//! ```

extern crate self as concept_router;

pub mod config;
mod error;
pub mod handler;
#[cfg(feature = "http")]
pub mod http;
pub mod logging;
pub mod router;
mod session;

pub use error::{HandlerError, RouteError};
pub use handler::{
    bind, Arg, BoundArgs, FromArg, Handler, HandlerResult, IntoHandlerResult, Json,
    RequestContext, Signature,
};
pub use router::{invoke, ConceptRouter, Method, Reply, RouteTable};
pub use session::Session;

pub use concept_router_macros::handler;
