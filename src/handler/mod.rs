//! Handlers and the parameter binder.
//!
//! A [`Handler`] declares an ordered list of parameter names. For every
//! request the binder resolves each name against the [`RequestContext`]
//! and produces [`BoundArgs`], one [`Arg`] per name:
//!
//! - `session`, `query`, `body` and `params` bind the whole source.
//! - Any other name is looked up in path parameters, then query
//!   parameters, then body fields.
//! - Names found nowhere bind [`Arg::Absent`]; the list never shifts.
//!
//! Handlers usually come from the `#[handler]` attribute, which reads the
//! parameter names off a plain function at compile time:
//!
//! ```ignore
//! use concept_router::{handler, HandlerError, Session};
//! use serde_json::{json, Value};
//!
//! #[handler]
//! async fn delete(session: Session, _id: String) -> Result<Value, HandlerError> {
//!     let user = session.require_user()?;
//!     Ok(json!({ "msg": format!("{} deleted {}", user, _id) }))
//! }
//!
//! let handler = delete_handler(); // signature: (session, _id)
//! ```

mod binder;
mod context;
mod extract;
mod handler;
mod signature;

pub use binder::{bind, Arg, BoundArgs};
pub use context::RequestContext;
pub use extract::{FromArg, Json};
pub use handler::{Handler, HandlerResult, IntoHandlerResult};
pub use signature::{Param, ParamSource, Signature, OPTIONAL_MARKER};
