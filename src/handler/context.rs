//! Request context: the named value sources of one inbound request.

use serde_json::{Map, Value};

use crate::session::Session;

/// Path parameters, query parameters, body and session of one request.
///
/// Built at the start of each request, moved into the dispatcher and
/// dropped once the reply exists. Never shared between requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    params: Map<String, Value>,
    query: Map<String, Value>,
    body: Value,
    session: Session,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            params: Map::new(),
            query: Map::new(),
            body: Value::Object(Map::new()),
            session: Session::new(),
        }
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one path parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Replace the path parameters.
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params = params
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        self
    }

    /// Add one query parameter. A key seen twice collapses into an array.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = Value::String(value.into());
        match self.query.get_mut(&name) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.query.insert(name, value);
            }
        }
        self
    }

    /// Add query parameters from decoded `key=value` pairs.
    pub fn with_query_pairs<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(self, |ctx, (k, v)| ctx.with_query(k, v))
    }

    /// Add query parameters from a raw, still encoded query string.
    pub fn with_query_string(self, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.with_query_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub(crate) fn set_params(&mut self, params: Map<String, Value>) {
        self.params = params;
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
