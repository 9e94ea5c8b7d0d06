//! Submission values exchanged between the feedback form and its handlers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned by the direct-invocation handler on success.
pub const SUBMITTED_MESSAGE: &str = "Feedback submitted!";

/// A required form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Message,
}

impl Field {
    /// The form-encoded field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required field was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("the {0} field is required")]
    Missing(Field),
}

/// Name and message captured from one form submission.
///
/// Both values are non-empty once constructed; whitespace-only input counts
/// as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackSubmission {
    name: String,
    message: String,
}

impl FeedbackSubmission {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Result<Self, FieldError> {
        let name = name.into();
        let message = message.into();

        if name.trim().is_empty() {
            return Err(FieldError::Missing(Field::Name));
        }
        if message.trim().is_empty() {
            return Err(FieldError::Missing(Field::Message));
        }

        Ok(Self { name, message })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Whether a submission went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// What the form shows once a submission resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub outcome: Outcome,
    pub display_message: String,
}

impl SubmissionResult {
    pub fn success(display_message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            display_message: display_message.into(),
        }
    }

    pub fn failure(display_message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure,
            display_message: display_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Confirmation text shown after a successful submission.
pub fn confirmation(name: &str) -> String {
    format!("Thank you, {name}! Your feedback has been received.")
}

/// Wire response of the direct-invocation handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn submitted() -> Self {
        Self {
            success: true,
            message: SUBMITTED_MESSAGE.to_string(),
        }
    }
}
