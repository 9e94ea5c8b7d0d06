//! Feedback form controller.
//!
//! Holds the two input fields and the view state of one form instance, and
//! drives a [`Submitter`] when the user submits. At most one submission may
//! be outstanding per instance; a second `submit` while one is pending is
//! rejected without touching state.
//!
//! ```text
//! Idle ──submit──▶ Pending ──▶ Success(msg)
//!                     │
//!                     └──────▶ Error(msg)
//! Success/Error ──submit──▶ Pending
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;

use crate::latency::{FORM_LATENCY, Latency, SimulatedLatency};
use crate::submission::{FeedbackSubmission, FieldError, Outcome, SubmissionResult, confirmation};

/// Anything that can carry a submission to a handler.
pub trait Submitter: Send + Sync {
    fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> impl Future<Output = SubmissionResult> + Send;
}

/// Submitter that waits and then reports success, without reaching a server.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSubmitter<L = SimulatedLatency> {
    latency: L,
}

impl SimulatedSubmitter<SimulatedLatency> {
    pub fn new(delay: Duration) -> Self {
        Self {
            latency: SimulatedLatency::new(delay),
        }
    }
}

impl<L: Latency> SimulatedSubmitter<L> {
    pub fn with_latency(latency: L) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedSubmitter<SimulatedLatency> {
    fn default() -> Self {
        Self::new(FORM_LATENCY)
    }
}

impl<L: Latency> Submitter for SimulatedSubmitter<L> {
    fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> impl Future<Output = SubmissionResult> + Send {
        async move {
            self.latency.wait().await;
            SubmissionResult::success(confirmation(submission.name()))
        }
    }
}

/// What the form currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Pending,
    Success(String),
    Error(String),
}

impl FormState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The status text, if a submission has resolved.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(msg) | Self::Error(msg) => Some(msg),
            Self::Idle | Self::Pending => None,
        }
    }

    /// Visual treatment of the status block.
    pub fn tone(&self) -> Option<Tone> {
        match self {
            Self::Success(_) => Some(Tone::Success),
            Self::Error(_) => Some(Tone::Error),
            Self::Idle | Self::Pending => None,
        }
    }
}

impl From<&SubmissionResult> for FormState {
    fn from(result: &SubmissionResult) -> Self {
        match result.outcome {
            Outcome::Success => Self::Success(result.display_message.clone()),
            Outcome::Failure => Self::Error(result.display_message.clone()),
        }
    }
}

/// Color coding of a resolved submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    /// CSS modifier used by the rendered status block.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "status--success",
            Self::Error => "status--error",
        }
    }
}

/// Current input values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub message: String,
}

/// Why a submit did not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FieldError),

    #[error("a submission is already in flight")]
    InFlight,
}

/// One feedback form instance.
#[derive(Debug)]
pub struct FeedbackForm<S> {
    submitter: S,
    fields: Mutex<FormFields>,
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

impl<S: Submitter> FeedbackForm<S> {
    pub fn new(submitter: S) -> Self {
        Self {
            submitter,
            fields: Mutex::new(FormFields::default()),
            state: Mutex::new(FormState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.lock_fields().name = name.into();
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.lock_fields().message = message.into();
    }

    /// Sets both fields at once.
    pub fn fill(&self, name: impl Into<String>, message: impl Into<String>) {
        let mut fields = self.lock_fields();
        fields.name = name.into();
        fields.message = message.into();
    }

    pub fn fields(&self) -> FormFields {
        self.lock_fields().clone()
    }

    pub fn state(&self) -> FormState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the submit control is disabled.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submits the current field values.
    ///
    /// Returns [`SubmitError::InFlight`] while another submission from this
    /// instance is outstanding, and [`SubmitError::Invalid`] if a required
    /// field is blank; neither changes the form. Otherwise the state moves to
    /// `Pending`, then to `Success` or `Error` once the submitter resolves.
    /// A successful submission clears both fields. Dropping the future before
    /// it resolves puts back the state `Pending` replaced.
    pub async fn submit(&self) -> Result<SubmissionResult, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::InFlight);
        }
        let mut flight = FlightGuard {
            in_flight: &self.in_flight,
            state: &self.state,
            restore: None,
        };

        let submission = {
            let fields = self.lock_fields();
            FeedbackSubmission::new(fields.name.clone(), fields.message.clone())?
        };

        flight.restore = Some(self.state());
        self.set_state(FormState::Pending);

        let result = self.submitter.submit(submission).await;

        flight.restore = None;
        self.set_state(FormState::from(&result));
        if result.is_success() {
            *self.lock_fields() = FormFields::default();
        }

        Ok(result)
    }

    fn set_state(&self, next: FormState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn lock_fields(&self) -> std::sync::MutexGuard<'_, FormFields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag when the submit future completes or is dropped.
/// A submit dropped while `Pending` puts back the state it replaced.
struct FlightGuard<'a> {
    in_flight: &'a AtomicBool,
    state: &'a Mutex<FormState>,
    restore: Option<FormState>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            *self.state.lock().unwrap_or_else(PoisonError::into_inner) = previous;
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Submitter that always fails after the default form latency.
    struct FailingSubmitter;

    impl Submitter for FailingSubmitter {
        fn submit(
            &self,
            _submission: FeedbackSubmission,
        ) -> impl Future<Output = SubmissionResult> + Send {
            async {
                tokio::time::sleep(FORM_LATENCY).await;
                SubmissionResult::failure("Something went wrong. Please try again.")
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_pending_success() {
        let form = Arc::new(FeedbackForm::new(SimulatedSubmitter::default()));
        form.fill("Ann", "Hi");
        assert_eq!(form.state(), FormState::Idle);

        let task = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.submit().await }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(form.state(), FormState::Pending);
        assert!(form.is_pending());

        let result = task.await.unwrap().unwrap();
        assert!(result.is_success());
        assert_eq!(
            form.state(),
            FormState::Success("Thank you, Ann! Your feedback has been received.".to_string())
        );
        assert!(!form.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_pending_is_rejected() {
        let form = Arc::new(FeedbackForm::new(SimulatedSubmitter::default()));
        form.fill("Ann", "Hi");

        let task = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.submit().await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;

        form.fill("Bob", "Again");
        assert_eq!(form.submit().await, Err(SubmitError::InFlight));
        assert_eq!(form.state(), FormState::Pending);

        let result = task.await.unwrap().unwrap();
        assert!(result.display_message.contains("Ann"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fields_reset_after_success() {
        let form = FeedbackForm::new(SimulatedSubmitter::default());
        form.set_name("Ann");
        form.set_message("Hi");

        form.submit().await.unwrap();

        assert_eq!(form.fields(), FormFields::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_field_leaves_state_untouched() {
        let form = FeedbackForm::new(SimulatedSubmitter::default());
        form.fill("Ann", "");

        let err = form.submit().await.unwrap_err();

        assert_eq!(err, SubmitError::Invalid(FieldError::Missing(crate::Field::Message)));
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.fields().name, "Ann");
        assert!(!form.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_fields_and_shows_error() {
        let form = FeedbackForm::new(FailingSubmitter);
        form.fill("Ann", "Hi");

        let result = form.submit().await.unwrap();

        assert_eq!(result.outcome, Outcome::Failure);
        assert_eq!(form.state().tone(), Some(Tone::Error));
        assert_eq!(form.fields().name, "Ann");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_after_success() {
        let form = FeedbackForm::new(SimulatedSubmitter::default());
        form.fill("Ann", "Hi");
        form.submit().await.unwrap();

        form.fill("Bob", "Hello");
        let result = form.submit().await.unwrap();

        assert_eq!(result.display_message, confirmation("Bob"));
        assert_eq!(form.state().message(), Some(confirmation("Bob").as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_restores_previous_state() {
        let form = FeedbackForm::new(SimulatedSubmitter::default());
        form.fill("Ann", "Hi");

        let dropped = tokio::time::timeout(Duration::from_millis(10), form.submit()).await;
        assert!(dropped.is_err());

        assert_eq!(form.state(), FormState::Idle);
        assert!(!form.is_pending());
        assert_eq!(form.fields().name, "Ann");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_resubmit_keeps_last_outcome() {
        let form = FeedbackForm::new(SimulatedSubmitter::default());
        form.fill("Ann", "Hi");
        form.submit().await.unwrap();
        let settled = form.state();

        form.fill("Bob", "Hello");
        let dropped = tokio::time::timeout(Duration::from_millis(10), form.submit()).await;
        assert!(dropped.is_err());

        assert_eq!(form.state(), settled);
        assert!(!form.is_pending());
    }

    #[test]
    fn test_tone_classes_differ() {
        assert_ne!(Tone::Success.css_class(), Tone::Error.css_class());
        assert_eq!(FormState::Idle.tone(), None);
        assert_eq!(FormState::Pending.tone(), None);
        assert_eq!(FormState::Success(String::new()).tone(), Some(Tone::Success));
    }
}
