//! The process-wide route table.

use std::cmp::Ordering;

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::dispatch::{invoke, Reply};
use super::method::Method;
use super::path::PathPattern;
use super::router::{ConceptRouter, Route, RouteSet};
use crate::error::RouteError;
use crate::handler::{Handler, RequestContext};

/// Prefix [`RouteTable::mount_concept`] mounts concepts under.
pub const API_PREFIX: &str = "/api";

/// Every route the server answers.
///
/// Built once during start-up, then shared read-only (typically behind an
/// `Arc`) with the transport. Lookups take `&self` and need no locking.
///
/// ```ignore
/// let mut table = RouteTable::new();
/// table.mount_concept(freets_router)?;   // /api/freets/...
/// table.post("/login", login_handler())?;
/// let table = Arc::new(table);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: RouteSet,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single route at an absolute path.
    pub fn register(
        &mut self,
        method: Method,
        path: &str,
        handler: Handler,
    ) -> Result<&mut Self, RouteError> {
        let pattern = PathPattern::parse(path)?;
        let logged = pattern.to_string();
        let name = handler.name().to_string();
        self.routes.insert(method, pattern, handler)?;
        info!(method = %method, path = %logged, handler = %name, "route registered");
        Ok(self)
    }

    pub fn get(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Get, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Post, path, handler)
    }

    /// Mount every route of `router` under `prefix`.
    ///
    /// Nothing is added if any of the routes collides.
    pub fn mount(&mut self, prefix: &str, router: ConceptRouter) -> Result<&mut Self, RouteError> {
        let prefix = PathPattern::parse(prefix)?;
        let concept = router.name().to_string();

        let mut staged = self.routes.clone();
        let mut added = Vec::new();
        for route in router.into_routes() {
            let pattern = PathPattern::join(&prefix, route.pattern())?;
            added.push((route.method(), pattern.to_string(), route.handler().name().to_string()));
            staged.insert(route.method(), pattern, route.handler().clone())?;
        }
        self.routes = staged;

        for (method, path, handler) in added {
            info!(concept = %concept, method = %method, path = %path, handler = %handler, "route registered");
        }
        Ok(self)
    }

    /// Mount `router` under `/api/<name>`.
    pub fn mount_concept(&mut self, router: ConceptRouter) -> Result<&mut Self, RouteError> {
        let prefix = format!("{}/{}", API_PREFIX, router.name());
        self.mount(&prefix, router)
    }

    pub fn routes(&self) -> &[Route] {
        self.routes.routes()
    }

    pub fn len(&self) -> usize {
        self.routes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes().is_empty()
    }

    /// Find the route answering `method` on `path`, with its captured path
    /// parameters. The most specific pattern wins.
    ///
    /// A `HEAD` request with no route of its own is answered by the
    /// matching `GET` route.
    pub fn find(&self, method: Method, path: &str) -> Option<(&Route, Map<String, Value>)> {
        match self.find_exact(method, path) {
            None if method == Method::Head => self.find_exact(Method::Get, path),
            found => found,
        }
    }

    fn find_exact(&self, method: Method, path: &str) -> Option<(&Route, Map<String, Value>)> {
        let mut best: Option<(&Route, Map<String, Value>)> = None;
        for route in self.routes().iter().filter(|r| r.method().accepts(method)) {
            let Some(params) = route.pattern().matches(path) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    route.pattern().specificity(current.pattern()) == Ordering::Greater
                }
            };
            if better {
                best = Some((route, params));
            }
        }
        best
    }

    /// Dispatch a request in-process.
    ///
    /// Path parameters in `ctx` are replaced by the ones captured from
    /// `path`. An unknown route gives a 404 reply.
    pub async fn dispatch(&self, method: Method, path: &str, mut ctx: RequestContext) -> Reply {
        let Some((route, params)) = self.find(method, path) else {
            debug!(method = %method, path, "no route");
            return Reply::not_found();
        };
        debug!(
            method = %method,
            path,
            route = %route.pattern(),
            handler = route.handler().name(),
            "dispatching"
        );
        ctx.set_params(params);
        invoke(route.handler(), ctx).await
    }
}
