//! What dispatch and registration write to the `tracing` log.

use std::io;
use std::sync::{Arc, Mutex};

use concept_router::{ConceptRouter, Handler, Method, RequestContext, RouteTable};
use serde_json::json;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::support::{test_table, NoteStore};

/// Log output collected in memory.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    /// Route this thread's log events here until the guard drops.
    fn install() -> (Self, DefaultGuard) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn noop(name: &str) -> Handler {
    Handler::sync(name, &[] as &[&str], |_| Ok(json!({})))
}

#[tokio::test]
async fn internal_failure_cause_is_logged_not_sent() {
    let table = test_table(&NoteStore::new());
    let (logs, _guard) = Captured::install();

    let reply = table
        .dispatch(Method::Get, "/api/broken", RequestContext::new())
        .await;

    assert_eq!(reply.status, 500);
    assert!(!reply.body.to_string().contains("hunter2"));
    let text = logs.text();
    assert!(text.contains("ERROR"), "{text}");
    assert!(text.contains("postgres://admin:hunter2"), "{text}");
}

#[tokio::test]
async fn panic_payload_is_logged_not_sent() {
    let table = test_table(&NoteStore::new());
    let (logs, _guard) = Captured::install();

    let reply = table
        .dispatch(
            Method::Post,
            "/api/explode",
            RequestContext::new().with_body(json!({ "reason": "kaboom" })),
        )
        .await;

    assert_eq!(reply.status, 500);
    assert!(!reply.body.to_string().contains("kaboom"));
    let text = logs.text();
    assert!(text.contains("handler panicked"), "{text}");
    assert!(text.contains("secret panic detail: kaboom"), "{text}");
}

#[test]
fn rejected_duplicate_is_not_logged_as_registered() {
    let mut table = RouteTable::new();
    table.post("/login", noop("first")).unwrap();

    let (logs, _guard) = Captured::install();
    assert!(table.post("/login", noop("second")).is_err());
    assert!(!logs.text().contains("route registered"), "{}", logs.text());

    table.post("/logout", noop("third")).unwrap();
    assert_eq!(logs.text().matches("route registered").count(), 1);
}

#[test]
fn rolled_back_mount_logs_nothing() {
    let mut table = RouteTable::new();
    table.get("/api/things/:id", noop("existing")).unwrap();

    let mut things = ConceptRouter::new("things");
    things.post("/", noop("create")).unwrap();
    things.get("/:_id", noop("read-one")).unwrap();

    let (logs, _guard) = Captured::install();
    assert!(table.mount_concept(things).is_err());
    assert!(!logs.text().contains("route registered"), "{}", logs.text());
    assert_eq!(table.len(), 1);
}
