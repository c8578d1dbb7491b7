//! HTTP transport: serves a [`RouteTable`] with axum.
//!
//! Requires the `http` feature.
//!
//! ## Routes
//!
//! - Every route in the table, matched by the table itself from a single
//!   fallback handler.
//! - `GET /health` → `{ "ok": true, "routes": [...] }`, unless the table
//!   registers that route itself. Other methods on `/health` go to the
//!   table like any path.
//!
//! ## Request mapping
//!
//! - Path parameters come from the matched pattern.
//! - Query parameters come from the query string.
//! - The body is parsed as JSON. An empty body is `{}`.
//! - `x-session-<key>` headers become session variables `<key>`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use concept_router::{http, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.mount_concept(freets_router())?;
//!
//! // Compose with other axum routes
//! let app = http::router(Arc::new(table));
//!
//! // Or serve directly
//! http::serve(Arc::new(table), "0.0.0.0:3000").await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method as HttpMethod, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::HandlerError;
use crate::handler::RequestContext;
use crate::router::{Method, Reply, RouteTable};
use crate::session::Session;

/// Prefix of headers that carry session variables.
pub const SESSION_HEADER_PREFIX: &str = "x-session-";

/// Path of the built-in health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Build an axum `Router` that dispatches through `table`.
pub fn router(table: Arc<RouteTable>) -> Router {
    Router::new().fallback(dispatch_handler).with_state(table)
}

/// Serve `table` over HTTP at `addr` (e.g. `"0.0.0.0:3000"`).
pub async fn serve(table: Arc<RouteTable>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(table);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}

/// Serve `table` at the address in `config`.
pub async fn serve_with_config(
    table: Arc<RouteTable>,
    config: &ServerConfig,
) -> Result<(), std::io::Error> {
    serve(table, &config.addr()).await
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

/// `GET /health`: `{ "ok": true, "routes": [...] }`.
fn health_reply(table: &RouteTable) -> Reply {
    let routes: Vec<String> = table
        .routes()
        .iter()
        .map(|r| format!("{} {}", r.method(), r.pattern()))
        .collect();
    Reply::ok(json!({ "ok": true, "routes": routes }))
}

fn is_health_request(table: &RouteTable, method: Method, path: &str) -> bool {
    matches!(method, Method::Get | Method::Head)
        && path.trim_end_matches('/') == HEALTH_PATH
        && table.find(method, path).is_none()
}

/// Look the request up in the table and dispatch it.
async fn dispatch_handler(
    State(table): State<Arc<RouteTable>>,
    method: HttpMethod,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    let Ok(method) = Method::try_from(&method) else {
        debug!(method = %method, "unsupported method");
        return Reply::not_found();
    };

    if is_health_request(&table, method, uri.path()) {
        return health_reply(&table);
    }

    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(err) => return Reply::from_error(&err),
    };

    let ctx = RequestContext::new()
        .with_query_string(query.as_deref().unwrap_or_default())
        .with_body(body)
        .with_session(session_from_headers(&headers));

    table.dispatch(method, uri.path(), ctx).await
}

fn parse_body(body: &Bytes) -> Result<Value, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|_| HandlerError::BadValues("invalid JSON body".into()))
}

/// Extract session variables from `x-session-*` headers.
///
/// Header names arrive lowercased; the prefix is stripped.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = HashMap::new();
    for (name, value) in headers.iter() {
        let Some(key) = name.as_str().strip_prefix(SESSION_HEADER_PREFIX) else {
            continue;
        };
        if let Ok(v) = value.to_str() {
            vars.insert(key.to_string(), Value::String(v.to_string()));
        }
    }
    Session::from_map(vars)
}
