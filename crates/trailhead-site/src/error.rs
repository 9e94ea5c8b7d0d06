//! Handler errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("feedback submission task failed: {0}")]
    Submission(#[from] tokio::task::JoinError),
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
