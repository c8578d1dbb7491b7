//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use concept_router::{http, Handler, RouteTable};
use serde_json::{json, Value};

use crate::support::{test_table, NoteStore};

/// Bind to port 0 and return the actual address.
async fn start_server(table: RouteTable) -> String {
    let app = http::router(Arc::new(table));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_check() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    let routes = body["routes"].as_array().unwrap();
    assert!(routes.contains(&json!("POST /api/notes")));
    assert!(routes.contains(&json!("DELETE /api/notes/:_id")));
}

#[tokio::test]
async fn plain_value_exact_body() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/api/document")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "document": { "id": "1" } }));
}

#[tokio::test]
async fn typed_failure_403() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/api/forbidden")).send().await.unwrap();
    assert_eq!(resp.status(), 403);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "nope" }));
}

#[tokio::test]
async fn internal_failure_hides_detail() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/api/broken")).send().await.unwrap();
    assert_eq!(resp.status(), 500);
    let text = resp.text().await.unwrap();
    assert!(!text.contains("hunter2"));

    let resp = client
        .post(format!("{base}/api/explode"))
        .json(&json!({ "reason": "kaboom" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let text = resp.text().await.unwrap();
    assert!(!text.contains("kaboom"));
    assert!(!text.contains("secret"));
}

#[tokio::test]
async fn server_survives_panicking_handler() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let resp = client
            .post(format!("{base}/api/explode"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
    }
    let resp = client.get(format!("{base}/api/document")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn unknown_route_404() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/api/nope")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Page not found" }));

    // Registered path, unregistered method.
    let resp = client.put(format!("{base}/api/document")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn invalid_json_body_400() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/notes"))
        .header("content-type", "application/json")
        .header("x-session-user", "alice")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "invalid JSON body" }));
}

#[tokio::test]
async fn session_from_headers() {
    let store = NoteStore::new();
    let base = start_server(test_table(&store)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/notes"))
        .json(&json!({ "content": "anonymous" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .post(format!("{base}/api/notes"))
        .header("x-session-user", "alice")
        .json(&json!({ "content": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["note"]["author"], "alice");
    assert_eq!(store.list(Some("alice")).len(), 1);
}

#[tokio::test]
async fn path_query_and_body_reach_handler() {
    let store = NoteStore::new();
    let id = store.insert("alice".into(), "before".into()).id;
    store.insert("bob".into(), "other".into());
    let base = start_server(test_table(&store)).await;
    let client = reqwest::Client::new();

    let resp = client
        .patch(format!("{base}/api/notes/{id}"))
        .header("x-session-user", "alice")
        .json(&json!({ "update": { "content": "after" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{base}/api/notes?author=alice"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "notes": [{ "id": id.as_str(), "author": "alice", "content": "after" }] })
    );
}

#[tokio::test]
async fn percent_encoded_path_param_is_decoded() {
    let store = NoteStore::new();
    let base = start_server(test_table(&store)).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/notes/no%20such%20note"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Note no such note does not exist!" }));
}

#[tokio::test]
async fn table_route_on_health_path_is_reachable() {
    let mut table = RouteTable::new();
    table
        .post(
            "/health",
            Handler::sync("report", &["status"], |mut args| {
                let status: String = args.take(0)?;
                Ok(json!({ "reported": status }))
            }),
        )
        .unwrap();
    let base = start_server(table).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/health"))
        .json(&json!({ "status": "green" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "reported": "green" }));

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "routes": ["POST /health"] }));
}

#[tokio::test]
async fn table_can_own_health() {
    let mut table = RouteTable::new();
    table
        .get(
            "/health",
            Handler::sync("custom-health", &[] as &[&str], |_| Ok(json!({ "custom": true }))),
        )
        .unwrap();
    let base = start_server(table).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "custom": true }));
}

#[tokio::test]
async fn head_uses_get_route() {
    let base = start_server(test_table(&NoteStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client.head(format!("{base}/api/document")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.head(format!("{base}/api/nowhere")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}
