//! Route registration: per-concept routers.

use tracing::debug;

use super::method::Method;
use super::path::PathPattern;
use crate::error::RouteError;
use crate::handler::Handler;

/// One registered route.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

impl Route {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Routes with a uniqueness check on `(method, path shape)`.
#[derive(Debug, Clone, Default)]
pub(crate) struct RouteSet {
    routes: Vec<Route>,
}

impl RouteSet {
    pub(crate) fn insert(
        &mut self,
        method: Method,
        pattern: PathPattern,
        handler: Handler,
    ) -> Result<(), RouteError> {
        let taken = self
            .routes
            .iter()
            .any(|r| r.method.overlaps(method) && r.pattern.same_shape(&pattern));
        if taken {
            return Err(RouteError::DuplicateRoute {
                method,
                path: pattern.to_string(),
            });
        }
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(())
    }

    pub(crate) fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub(crate) fn into_routes(self) -> Vec<Route> {
        self.routes
    }
}

/// The routes of one concept, registered under paths relative to the
/// prefix the concept is later mounted at.
///
/// ```ignore
/// let mut freets = ConceptRouter::new("freets");
/// freets
///     .get("/", read_handler())?
///     .post("/", create_handler())?
///     .patch("/:_id", update_handler())?
///     .delete("/:_id", delete_handler())?;
/// ```
#[derive(Debug, Clone)]
pub struct ConceptRouter {
    name: String,
    routes: RouteSet,
}

impl ConceptRouter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: RouteSet::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `handler` for `method` and `path`.
    ///
    /// Fails if an overlapping method is already registered for a path of
    /// the same shape, or if `path` does not parse.
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
        debug!(
            concept = %self.name,
            method = %method,
            path = %logged,
            handler = %name,
            "route added"
        );
        Ok(self)
    }

    pub fn all(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::All, path, handler)
    }

    pub fn get(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Get, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Post, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Put, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Delete, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Patch, path, handler)
    }

    pub fn options(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Options, path, handler)
    }

    pub fn head(&mut self, path: &str, handler: Handler) -> Result<&mut Self, RouteError> {
        self.register(Method::Head, path, handler)
    }

    pub fn routes(&self) -> &[Route] {
        self.routes.routes()
    }

    pub(crate) fn into_routes(self) -> Vec<Route> {
        self.routes.into_routes()
    }
}
