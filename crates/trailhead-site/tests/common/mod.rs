//! Shared helpers for the site integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Query, State},
    http::{HeaderMap, Request, StatusCode},
    routing,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use trailhead_config::TrailheadConfig;
use trailhead_feedback::MemorySink;
use trailhead_site::{SiteState, app};

/// Development config with a short action latency and the given posts API.
pub fn test_config(api_base: &str) -> TrailheadConfig {
    let mut config = TrailheadConfig::development();
    config.feedback.action_latency_ms = 10;
    config.posts.api_base = api_base.to_string();
    config.posts.timeout_secs = 2;
    config
}

/// Router plus the sink capturing feedback diagnostics.
pub fn test_app(config: &TrailheadConfig) -> (Router, MemorySink) {
    let sink = MemorySink::new();
    let state = SiteState::with_sink(config, Arc::new(sink.clone())).unwrap();
    (app(state), sink)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> TestResponse {
    let request = Request::post(uri)
        .header("content-type", content_type)
        .body(body.into())
        .unwrap();
    send(app, request).await
}

/// Value of the `data-rendered-at` attribute on the feedback page.
pub fn rendered_at(html: &str) -> &str {
    let start = html.find("data-rendered-at=\"").unwrap() + "data-rendered-at=\"".len();
    let len = html[start..].find('"').unwrap();
    &html[start..start + len]
}

/// Local stand-in for the posts API that counts requests.
pub struct FakePostsApi {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl FakePostsApi {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct FakeState {
    hits: Arc<AtomicUsize>,
    status: StatusCode,
}

async fn fake_posts(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !state.status.is_success() {
        return (state.status, Json(json!({ "error": "unavailable" })));
    }

    let limit: u64 = query
        .get("_limit")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(100);
    let posts: Vec<Value> = (1..=limit)
        .map(|id| {
            json!({
                "userId": 1,
                "id": id,
                "title": format!("post title {id}"),
                "body": format!("post body {id}"),
            })
        })
        .collect();

    (StatusCode::OK, Json(Value::Array(posts)))
}

pub async fn spawn_posts_api(status: StatusCode) -> FakePostsApi {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/posts", routing::get(fake_posts))
        .with_state(FakeState {
            hits: Arc::clone(&hits),
            status,
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    FakePostsApi {
        base_url: format!("http://{addr}"),
        hits,
    }
}
