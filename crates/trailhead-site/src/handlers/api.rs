//! JSON API endpoints.

use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::iso8601;

/// Response from `GET /api/hello`.
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub info: &'static str,
    pub tip: &'static str,
}

/// Response from `POST /api/hello`.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub message: &'static str,
    /// Request body, unchanged.
    pub received: Value,
    pub timestamp: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed JSON body")]
    MalformedJson(#[from] serde_json::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJson(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            Self::MalformedJson(source) => source.to_string(),
        };
        tracing::warn!(error = %self, %details, "Rejected API request");

        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
                details: Some(details),
            }),
        )
            .into_response()
    }
}

/// Describes the endpoint.
///
/// GET /api/hello
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from the Trailhead API!",
        timestamp: iso8601(Utc::now()),
        info: "This endpoint is served by handlers::api::hello",
        tip: "You can create POST, PUT, DELETE endpoints too!",
    })
}

/// Echoes any JSON body back.
///
/// POST /api/hello
///
/// The body is parsed regardless of `Content-Type`.
pub async fn echo(body: Bytes) -> Result<Json<EchoResponse>, ApiError> {
    let received: Value = serde_json::from_slice(&body)?;

    tracing::info!(bytes = body.len(), "Echoing JSON body");

    Ok(Json(EchoResponse {
        message: "Data received!",
        received,
        timestamp: iso8601(Utc::now()),
    }))
}

/// Liveness probe.
///
/// GET /health
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
