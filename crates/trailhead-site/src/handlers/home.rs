//! Home and fallback pages.

use axum::{http::StatusCode, response::IntoResponse};

use crate::templates::{HomeTemplate, NotFoundTemplate};

/// Handler for / - the lesson catalog.
pub async fn home() -> impl IntoResponse {
    HomeTemplate::new("Trailhead")
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate::new())
}
