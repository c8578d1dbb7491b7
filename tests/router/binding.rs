//! Binder properties: argument count, order, and source precedence.

use concept_router::{bind, Arg, RequestContext, Session, Signature};
use serde_json::{json, Value};

const PATH: &str = "from-path";
const QUERY: &str = "from-query";
const BODY: &str = "from-body";

/// A context holding `name` in every source selected by the flags.
fn context_with(name: &str, in_path: bool, in_query: bool, in_body: bool) -> RequestContext {
    let mut ctx = RequestContext::new();
    if in_path {
        ctx = ctx.with_param(name, PATH);
    }
    if in_query {
        ctx = ctx.with_query(name, QUERY);
    }
    if in_body {
        ctx = ctx.with_body(json!({ name: BODY }));
    }
    ctx
}

#[test]
fn every_source_combination_follows_path_query_body() {
    for mask in 0u8..8 {
        let (in_path, in_query, in_body) = (mask & 1 != 0, mask & 2 != 0, mask & 4 != 0);
        let ctx = context_with("id", in_path, in_query, in_body);
        let args = bind(&Signature::parse(&["id"]), &ctx);

        let expected = if in_path {
            Arg::Value(json!(PATH))
        } else if in_query {
            Arg::Value(json!(QUERY))
        } else if in_body {
            Arg::Value(json!(BODY))
        } else {
            Arg::Absent
        };
        assert_eq!(args.len(), 1);
        assert_eq!(args.get(0), Some(&expected), "path={in_path} query={in_query} body={in_body}");
    }
}

#[test]
fn length_matches_signature_whatever_is_missing() {
    let signature = Signature::parse(&["a", "b", "c", "d"]);
    let ctx = RequestContext::new()
        .with_param("b", "2")
        .with_body(json!({ "d": 4 }));

    let args = bind(&signature, &ctx);
    assert_eq!(args.len(), 4);
    assert_eq!(
        args.args(),
        &[
            Arg::Absent,
            Arg::Value(json!("2")),
            Arg::Absent,
            Arg::Value(json!(4)),
        ]
    );
    assert_eq!(args.names().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
}

#[test]
fn reserved_names_bind_whole_sources() {
    let session = Session::new();
    session.set("user", "alice");
    let ctx = RequestContext::new()
        .with_param("_id", "7")
        .with_query_string("author=alice&tag=a&tag=b")
        .with_body(json!({ "content": "hi" }))
        .with_session(session.clone());

    let args = bind(&Signature::parse(&["body", "query", "params", "session"]), &ctx);
    assert_eq!(args.get(0), Some(&Arg::Value(json!({ "content": "hi" }))));
    assert_eq!(
        args.get(1),
        Some(&Arg::Value(json!({ "author": "alice", "tag": ["a", "b"] })))
    );
    assert_eq!(args.get(2), Some(&Arg::Value(json!({ "_id": "7" }))));
    assert_eq!(args.get(3), Some(&Arg::Session(session)));
}

#[test]
fn optional_marker_does_not_change_lookup() {
    let ctx = RequestContext::new().with_query("author", "bob");
    let args = bind(&Signature::parse(&["author?", "tag?"]), &ctx);
    assert_eq!(args.get(0), Some(&Arg::Value(json!("bob"))));
    assert_eq!(args.get(1), Some(&Arg::Absent));
    assert_eq!(args.names().collect::<Vec<_>>(), ["author", "tag"]);
}

#[test]
fn null_is_skipped_for_the_next_source() {
    let ctx = RequestContext::new().with_body(json!({ "content": null }));
    let args = bind(&Signature::parse(&["content"]), &ctx);
    assert!(args.get(0).unwrap().is_absent());

    let ctx = RequestContext::new()
        .with_query("content", "q")
        .with_body(json!({ "content": null }));
    let args = bind(&Signature::parse(&["content"]), &ctx);
    assert_eq!(args.get(0), Some(&Arg::Value(json!("q"))));
}

#[test]
fn values_are_bound_without_coercion() {
    let ctx = RequestContext::new().with_body(json!({ "count": 3, "tags": ["x"], "flag": false }));
    let args = bind(&Signature::parse(&["count", "tags", "flag"]), &ctx);
    assert_eq!(
        args.args().iter().map(|a| a.as_value().cloned()).collect::<Vec<_>>(),
        vec![Some(json!(3)), Some(json!(["x"])), Some(Value::Bool(false))]
    );
}

#[test]
fn non_object_body_has_no_fields() {
    let ctx = RequestContext::new().with_body(json!(["content"]));
    let args = bind(&Signature::parse(&["content", "body"]), &ctx);
    assert!(args.get(0).unwrap().is_absent());
    assert_eq!(args.get(1), Some(&Arg::Value(json!(["content"]))));
}
