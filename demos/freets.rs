//! Freets demo server.
//!
//! Two concepts served over HTTP:
//!
//! - `freets` at `/api/freets`: short posts with an author. Anyone may
//!   read them; only the author may edit or delete one.
//! - `session` at `/api/session`: login, logout and whoami.
//!
//! The session is read from `x-session-*` headers, so it lives for one
//! request only:
//!
//! ```text
//! curl -X POST localhost:3000/api/freets -H 'x-session-user: alice' \
//!      -H 'content-type: application/json' -d '{"content":"hello"}'
//! curl 'localhost:3000/api/freets?author=alice'
//! ```
//!
//! Run with `cargo run --example freets`. `HOST`, `PORT`, `LOG_LEVEL` and
//! `LOG_FORMAT` configure it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use concept_router::config::ServerConfig;
use concept_router::{handler, http, logging, ConceptRouter, HandlerError, Json, RouteError, RouteTable, Session};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
struct Freet {
    _id: String,
    author: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct FreetUpdate {
    content: String,
}

#[derive(Clone, Default)]
struct Freets {
    docs: Arc<RwLock<HashMap<String, Freet>>>,
    next_id: Arc<AtomicU64>,
}

impl Freets {
    fn create(&self, author: String, content: String) -> Freet {
        let _id = format!("{:08x}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let freet = Freet {
            _id: _id.clone(),
            author,
            content,
        };
        self.docs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(_id, freet.clone());
        freet
    }

    fn read(&self, author: Option<&str>) -> Vec<Freet> {
        let docs = self.docs.read().unwrap_or_else(PoisonError::into_inner);
        let mut freets: Vec<Freet> = docs
            .values()
            .filter(|f| author.map_or(true, |a| f.author == a))
            .cloned()
            .collect();
        freets.sort_by(|a, b| a._id.cmp(&b._id));
        freets
    }

    /// Run `f` on a freet owned by the session's user.
    fn with_own<T>(
        &self,
        session: &Session,
        _id: &str,
        f: impl FnOnce(&mut HashMap<String, Freet>) -> T,
    ) -> Result<T, HandlerError> {
        let user = session.require_user()?;
        let mut docs = self.docs.write().unwrap_or_else(PoisonError::into_inner);
        let freet = docs
            .get(_id)
            .ok_or_else(|| HandlerError::NotFound(format!("Freet {} does not exist!", _id)))?;
        if freet.author != user {
            return Err(HandlerError::NotAllowed(
                "Cannot modify other users' freets!".into(),
            ));
        }
        Ok(f(&mut docs))
    }
}

fn validate_content(content: &str) -> Result<(), HandlerError> {
    if content.trim().is_empty() {
        return Err(HandlerError::BadValues("Freet content must not be empty".into()));
    }
    Ok(())
}

#[handler("freet.read")]
async fn read(#[state] freets: Freets, author: Option<String>) -> Result<Value, HandlerError> {
    Ok(json!({ "freets": freets.read(author.as_deref()) }))
}

#[handler("freet.create")]
async fn create(
    #[state] freets: Freets,
    session: Session,
    content: String,
) -> Result<Value, HandlerError> {
    let author = session.require_user()?;
    validate_content(&content)?;
    let freet = freets.create(author, content);
    Ok(json!({ "msg": "Freet created successfully!", "freet": freet }))
}

#[handler("freet.update")]
async fn update(
    #[state] freets: Freets,
    session: Session,
    _id: String,
    update: Json<FreetUpdate>,
) -> Result<Value, HandlerError> {
    let FreetUpdate { content } = update.into_inner();
    validate_content(&content)?;
    let freet = freets.with_own(&session, &_id, |docs| {
        docs.get_mut(&_id).map(|freet| {
            freet.content = content;
            freet.clone()
        })
    })?;
    Ok(json!({ "msg": "Freet updated successfully!", "freet": freet }))
}

#[handler("freet.delete")]
async fn delete(
    #[state] freets: Freets,
    session: Session,
    _id: String,
) -> Result<Value, HandlerError> {
    freets.with_own(&session, &_id, |docs| docs.remove(&_id))?;
    Ok(json!({ "msg": "Freet deleted successfully!" }))
}

#[handler("session.login")]
fn login(session: Session, username: String) -> Result<Value, HandlerError> {
    if username.trim().is_empty() {
        return Err(HandlerError::BadValues("Username must not be empty".into()));
    }
    session.start(username.clone())?;
    Ok(json!({ "msg": "Logged in!", "user": username }))
}

#[handler("session.logout")]
fn logout(session: Session) -> Result<Value, HandlerError> {
    let user = session.require_user()?;
    session.end()?;
    Ok(json!({ "msg": "Logged out!", "user": user }))
}

#[handler("session.whoami")]
fn whoami(session: Session) -> Result<Value, HandlerError> {
    Ok(json!({ "user": session.user() }))
}

fn freets_router(freets: &Freets) -> Result<ConceptRouter, RouteError> {
    let mut router = ConceptRouter::new("freets");
    router
        .get("/", read_handler(freets.clone()))?
        .post("/", create_handler(freets.clone()))?
        .patch("/:_id", update_handler(freets.clone()))?
        .delete("/:_id", delete_handler(freets.clone()))?;
    Ok(router)
}

fn session_router() -> Result<ConceptRouter, RouteError> {
    let mut router = ConceptRouter::new("session");
    router
        .post("/login", login_handler())?
        .post("/logout", logout_handler())?
        .get("/", whoami_handler())?;
    Ok(router)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    logging::init_logging(&config)?;

    let freets = Freets::default();
    freets.create("barish".into(), "Hello from the freets demo!".into());

    let mut table = RouteTable::new();
    table
        .mount_concept(freets_router(&freets)?)?
        .mount_concept(session_router()?)?;
    info!(routes = table.len(), "route table ready");

    http::serve_with_config(Arc::new(table), &config).await?;
    Ok(())
}
