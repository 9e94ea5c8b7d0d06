//! Feedback form action.
//!
//! The lesson page's form posts here. Each request drives a fresh
//! [`FeedbackForm`] over the shared [`FeedbackAction`], then renders the page
//! with the outcome.
//!
//! [`FeedbackAction`]: trailhead_feedback::FeedbackAction

use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use trailhead_feedback::{FeedbackForm, SubmitError};

use crate::{
    error::SiteError,
    lessons::API_SERVER_ACTIONS,
    state::SiteState,
    templates::{ApiServerActionsTemplate, StatusBlock},
};

/// Form-encoded body of the feedback form. Missing fields decode as empty.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// Handler for POST /lessons/api-server-actions.
pub async fn submit(
    State(state): State<SiteState>,
    Form(input): Form<FeedbackInput>,
) -> Result<Response, SiteError> {
    let form = FeedbackForm::new(state.feedback.clone());
    form.fill(input.name, input.message);

    // The action runs to completion even if the client goes away mid-wait.
    let (outcome, form_state, fields) = tokio::spawn(async move {
        let outcome = form.submit().await;
        (outcome, form.state(), form.fields())
    })
    .await?;

    let (status, block) = match outcome {
        Ok(_) => (StatusCode::OK, StatusBlock::from_state(&form_state)),
        Err(err @ SubmitError::Invalid(_)) => {
            tracing::info!(error = %err, "Rejected feedback submission");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Some(StatusBlock::error(err.to_string())),
            )
        }
        Err(err @ SubmitError::InFlight) => {
            (StatusCode::CONFLICT, Some(StatusBlock::error(err.to_string())))
        }
    };

    let html =
        ApiServerActionsTemplate::new(&API_SERVER_ACTIONS, block, fields, Utc::now()).render()?;

    Ok((status, Html(html)).into_response())
}
