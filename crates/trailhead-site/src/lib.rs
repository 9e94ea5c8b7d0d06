//! Trailhead site: server-rendered lessons, a JSON API and the feedback
//! form action.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
    routing::get,
};
use chrono::{DateTime, SecondsFormat, Utc};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;
use trailhead_config::TrailheadConfig;

pub mod error;
pub mod handlers;
pub mod lessons;
pub mod page_cache;
pub mod posts;
pub mod state;
pub mod templates;

pub use error::SiteError;
pub use state::SiteState;

/// Build version, stamped into every page.
pub const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; \
     img-src 'self' data:; frame-ancestors 'none'; form-action 'self'; base-uri 'self'";

/// Headers attached to every response unless a handler set them already.
fn security_headers() -> [(HeaderName, HeaderValue); 5] {
    [
        (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ),
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        ),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
    ]
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g.
/// `2026-01-01T12:00:00.000Z`.
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds the site router.
pub fn app(state: SiteState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::home::home))
        .route("/health", get(handlers::api::health))
        // Lessons
        .route("/lessons", get(handlers::lessons::index))
        .route("/lessons/routing", get(handlers::lessons::routing))
        .route("/lessons/server-client", get(handlers::lessons::server_client))
        .route("/lessons/data-fetching", get(handlers::lessons::data_fetching))
        .route(
            "/lessons/api-server-actions",
            get(handlers::lessons::api_server_actions).post(handlers::feedback::submit),
        )
        // API
        .route(
            "/api/hello",
            get(handlers::api::hello).post(handlers::api::echo),
        )
        .fallback(handlers::home::not_found)
        .with_state(state);

    for (name, value) in security_headers() {
        router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }

    router.layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn serve(config: &TrailheadConfig) -> Result<()> {
    let addr = config.bind_address()?;
    let state = SiteState::from_config(config).context("Failed to build site state")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Trailhead ready on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Trailhead stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
    }
}
