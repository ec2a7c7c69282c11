// tests/integration/upstream_test.rs

//! Integration tests for the Edamam client against a local fake upstream
//! Tests: decoding, credentials, retry on 5xx, no retry on 4xx, exhaustion of retries

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use larder::config::UpstreamConfig;
use larder::core::upstream::{EdamamClient, RecipeProvider};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

const PREFIX: &str = "http://www.edamam.com/ontologies/edamam.owl#recipe_";

#[derive(Clone)]
struct FakeUpstream {
    calls: Arc<AtomicUsize>,
    /// Requests answered with `failure_status` before the first success.
    failures: usize,
    failure_status: StatusCode,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeUpstream {
    fn new(failures: usize, failure_status: StatusCode) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            failures,
            failure_status,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn search(
    State(fake): State<FakeUpstream>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let call = fake.calls.fetch_add(1, Ordering::SeqCst);
    if call < fake.failures {
        return (fake.failure_status, Json(json!({ "error": "unavailable" })));
    }
    let body = json!({
        "hits": [{ "recipe": {
            "uri": format!("{PREFIX}abc"),
            "url": "https://cook.test/abc",
            "label": "Abc",
            "calories": 120.5,
            "digest": [{ "label": "Fat" }]
        }}],
        "_links": { "next": { "href": "https://next.test/page-2" } }
    });
    fake.seen.lock().push(params);
    (StatusCode::OK, Json(body))
}

async fn by_uri(
    State(fake): State<FakeUpstream>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    fake.calls.fetch_add(1, Ordering::SeqCst);
    let hits = match params.get("uri") {
        Some(uri) if uri == &format!("{PREFIX}abc") => {
            json!([{ "recipe": { "uri": uri, "url": "https://cook.test/abc" } }])
        }
        _ => json!([]),
    };
    fake.seen.lock().push(params);
    (StatusCode::OK, Json(json!({ "hits": hits })))
}

async fn start(fake: FakeUpstream) -> EdamamClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/search", get(search))
        .route("/by-uri", get(by_uri))
        .with_state(fake);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    EdamamClient::new(UpstreamConfig {
        search_url: format!("http://{addr}/search"),
        by_uri_url: format!("http://{addr}/by-uri"),
        app_id: "test-id".into(),
        app_key: "test-key".into(),
        timeout_ms: 2_000,
        max_retries: 2,
        retry_backoff_ms: 1,
        ..UpstreamConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_decodes_page_and_sends_credentials() {
    let fake = FakeUpstream::new(0, StatusCode::OK);
    let client = start(fake.clone()).await;

    let url = client.search_url("chicken curry").unwrap();
    let page = client.search(&url).await.unwrap();

    assert_eq!(page.hits.len(), 1);
    let recipe = &page.hits[0].recipe;
    assert_eq!(recipe.url, "https://cook.test/abc");
    assert_eq!(recipe.calories, Some(120.5));
    assert!(recipe.extra.contains_key("digest"));
    assert_eq!(page.next_cursor(), Some("https://next.test/page-2"));

    let seen = fake.seen.lock();
    assert_eq!(seen[0].get("q").map(String::as_str), Some("chicken curry"));
    assert_eq!(seen[0].get("app_id").map(String::as_str), Some("test-id"));
    assert_eq!(seen[0].get("type").map(String::as_str), Some("public"));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let fake = FakeUpstream::new(2, StatusCode::SERVICE_UNAVAILABLE);
    let client = start(fake.clone()).await;

    let url = client.search_url("soup").unwrap();
    let page = client.search(&url).await.unwrap();

    assert_eq!(page.hits.len(), 1);
    assert_eq!(fake.calls(), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let fake = FakeUpstream::new(usize::MAX, StatusCode::INTERNAL_SERVER_ERROR);
    let client = start(fake.clone()).await;

    let url = client.search_url("soup").unwrap();
    let err = client.search(&url).await.unwrap_err();

    assert_eq!(err.code(), "UPSTREAM_UNAVAILABLE");
    assert_eq!(fake.calls(), 3);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let fake = FakeUpstream::new(usize::MAX, StatusCode::UNAUTHORIZED);
    let client = start(fake.clone()).await;

    let url = client.search_url("soup").unwrap();
    let err = client.search(&url).await.unwrap_err();

    assert_eq!(err.code(), "UPSTREAM_UNAVAILABLE");
    assert_eq!(fake.calls(), 1);
}

#[tokio::test]
async fn test_lookup_by_uri() {
    let fake = FakeUpstream::new(0, StatusCode::OK);
    let client = start(fake.clone()).await;

    let found = client.lookup_by_uri(&format!("{PREFIX}abc")).await.unwrap();
    assert_eq!(found.hits.len(), 1);
    assert_eq!(found.next_cursor(), None);

    let missing = client.lookup_by_uri(&format!("{PREFIX}zzz")).await.unwrap();
    assert!(missing.hits.is_empty());
    assert_eq!(
        fake.seen.lock()[0].get("uri").map(String::as_str),
        Some(format!("{PREFIX}abc").as_str())
    );
}

#[tokio::test]
async fn test_unreachable_upstream_is_unavailable() {
    // Bind and drop to obtain a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = EdamamClient::new(UpstreamConfig {
        search_url: format!("http://{addr}/search"),
        max_retries: 1,
        retry_backoff_ms: 1,
        ..UpstreamConfig::default()
    })
    .unwrap();

    let url = client.search_url("soup").unwrap();
    let err = client.search(&url).await.unwrap_err();
    assert_eq!(err.code(), "UPSTREAM_UNAVAILABLE");
}
