//! Lesson page handlers.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use trailhead_feedback::FormFields;

use crate::{
    error::SiteError,
    lessons::{API_SERVER_ACTIONS, DATA_FETCHING, ROUTING, SERVER_CLIENT},
    posts::CacheMode,
    state::SiteState,
    templates::{
        ApiServerActionsTemplate, DataFetchingTemplate, RoutingTemplate, ServerClientTemplate,
    },
};

/// Cache tag carried by the feedback lesson page.
pub const FEEDBACK_TAG: &str = "feedback";

/// Response header reporting whether a page came from the page cache.
pub const PAGE_CACHE_HEADER: &str = "x-page-cache";

/// Handler for /lessons - start at the first lesson.
pub async fn index() -> Redirect {
    Redirect::to(&ROUTING.href())
}

/// Handler for /lessons/routing.
pub async fn routing() -> impl IntoResponse {
    RoutingTemplate::new(&ROUTING)
}

#[derive(Debug, Deserialize)]
pub struct CounterQuery {
    pub count: Option<String>,
}

/// Handler for /lessons/server-client.
///
/// The counter lives in the query string; anything unparsable counts as 0.
pub async fn server_client(Query(query): Query<CounterQuery>) -> impl IntoResponse {
    let count = query
        .count
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(0);

    ServerClientTemplate::new(&SERVER_CLIENT, Utc::now(), count)
}

#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    pub mode: Option<String>,
}

/// Handler for /lessons/data-fetching.
pub async fn data_fetching(
    State(state): State<SiteState>,
    Query(query): Query<ModeQuery>,
) -> impl IntoResponse {
    let mode = CacheMode::from_query(query.mode.as_deref(), state.revalidate_after);

    if !state.posts_render_delay.is_zero() {
        tokio::time::sleep(state.posts_render_delay).await;
    }

    let fetched = state.posts.fetch(mode).await.map_err(|err| {
        tracing::warn!(error = %err, mode = mode.key(), "Posts fetch failed");
        err.to_string()
    });

    DataFetchingTemplate::new(&DATA_FETCHING, mode, fetched)
}

/// Handler for GET /lessons/api-server-actions.
///
/// Served from the page cache until the feedback action marks it stale.
pub async fn api_server_actions(State(state): State<SiteState>) -> Result<Response, SiteError> {
    let path = API_SERVER_ACTIONS.href();
    let lookup = state.pages.get_or_render(&path, &[FEEDBACK_TAG], || {
        ApiServerActionsTemplate::new(
            &API_SERVER_ACTIONS,
            None,
            FormFields::default(),
            Utc::now(),
        )
        .render()
    })?;

    let cache_status = if lookup.is_hit() { "hit" } else { "miss" };
    let mut response = Html(lookup.into_page().html.to_string()).into_response();
    response
        .headers_mut()
        .insert(PAGE_CACHE_HEADER, HeaderValue::from_static(cache_status));

    Ok(response)
}
