//! Route dispatcher: registration, lookup and invocation.
//!
//! Concepts register their handlers on a [`ConceptRouter`]. The routers are
//! mounted into one [`RouteTable`] at start-up, and registration fails
//! right there on a duplicate `(method, path)`. The table is then shared
//! read-only with the transport. Each request is dispatched on its own:
//!
//! ```text
//! Pending -> Bound -> Executing -> Succeeded | FailedTyped | FailedInternal -> Responded
//! ```
//!
//! [`invoke`] runs that sequence for one handler and always yields exactly
//! one [`Reply`].

mod dispatch;
mod method;
mod path;
mod router;
mod table;

pub use dispatch::{invoke, Outcome, Reply, INTERNAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
pub use method::Method;
pub use path::PathPattern;
pub use router::{ConceptRouter, Route};
pub use table::{RouteTable, API_PREFIX};
