//! Direct-invocation feedback handler.
//!
//! Called by the lesson page's form post without an explicit network request
//! constructed by the caller. Waits, logs the submission, marks the page
//! stale and reports success.

use std::future::Future;
use std::sync::Arc;

use crate::diagnostics::{DiagnosticEntry, DiagnosticSink, TracingSink};
use crate::form::Submitter;
use crate::latency::{Latency, SimulatedLatency};
use crate::revalidate::Revalidator;
use crate::submission::{ActionResponse, FeedbackSubmission, SubmissionResult, confirmation};

/// Page whose rendered output the action invalidates by default.
pub const DEFAULT_PAGE_PATH: &str = "/lessons/api-server-actions";

/// The server-side feedback action.
#[derive(Clone)]
pub struct FeedbackAction<L = SimulatedLatency> {
    latency: L,
    sink: Arc<dyn DiagnosticSink>,
    revalidator: Revalidator,
    page_path: String,
}

impl FeedbackAction<SimulatedLatency> {
    /// Action with the default 500ms latency, logging through `tracing`.
    pub fn new(revalidator: Revalidator) -> Self {
        Self::with_parts(
            SimulatedLatency::default(),
            Arc::new(TracingSink),
            revalidator,
        )
    }
}

impl<L: Latency> FeedbackAction<L> {
    pub fn with_parts(latency: L, sink: Arc<dyn DiagnosticSink>, revalidator: Revalidator) -> Self {
        Self {
            latency,
            sink,
            revalidator,
            page_path: DEFAULT_PAGE_PATH.to_string(),
        }
    }

    /// Overrides the page marked stale after each submission.
    pub fn with_page_path(mut self, path: impl Into<String>) -> Self {
        self.page_path = path.into();
        self
    }

    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    /// Handles one submission. Always succeeds.
    pub async fn invoke(&self, submission: FeedbackSubmission) -> ActionResponse {
        self.latency.wait().await;

        self.sink
            .record(DiagnosticEntry::feedback_received(&submission));

        let subscribers = self.revalidator.revalidate_path(&self.page_path);
        tracing::debug!(path = %self.page_path, subscribers, "Marked page stale");

        ActionResponse::submitted()
    }
}

impl<L: Latency> Submitter for FeedbackAction<L> {
    fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> impl Future<Output = SubmissionResult> + Send {
        async move {
            let name = submission.name().to_string();
            let response = self.invoke(submission).await;

            if response.success {
                SubmissionResult::success(confirmation(&name))
            } else {
                SubmissionResult::failure(response.message)
            }
        }
    }
}

impl<L> std::fmt::Debug for FeedbackAction<L>
where
    L: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackAction")
            .field("latency", &self.latency)
            .field("page_path", &self.page_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::revalidate::Invalidation;
    use std::time::Duration;
    use tokio::time::Instant;

    fn action(sink: &MemorySink, revalidator: &Revalidator) -> FeedbackAction {
        FeedbackAction::with_parts(
            SimulatedLatency::default(),
            Arc::new(sink.clone()),
            revalidator.clone(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_returns_submitted() {
        let sink = MemorySink::new();
        let revalidator = Revalidator::default();
        let action = action(&sink, &revalidator);

        let submission = FeedbackSubmission::new("Ann", "Hi").unwrap();
        let response = action.invoke(submission).await;

        assert_eq!(
            response,
            ActionResponse {
                success: true,
                message: "Feedback submitted!".to_string(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_logs_exactly_once() {
        let sink = MemorySink::new();
        let revalidator = Revalidator::default();
        let action = action(&sink, &revalidator);

        let submission = FeedbackSubmission::new("Ann", "Hi").unwrap();
        action.invoke(submission).await;

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get("name"), Some("Ann"));
        assert_eq!(entries[0].get("message"), Some("Hi"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_marks_page_stale() {
        let sink = MemorySink::new();
        let revalidator = Revalidator::default();
        let mut rx = revalidator.subscribe();
        let action = action(&sink, &revalidator);

        let submission = FeedbackSubmission::new("Ann", "Hi").unwrap();
        action.invoke(submission).await;

        assert_eq!(rx.try_recv().unwrap(), Invalidation::path(DEFAULT_PAGE_PATH));
        assert!(rx.try_recv().is_err(), "exactly one invalidation");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_waits_before_logging() {
        let sink = MemorySink::new();
        let revalidator = Revalidator::default();
        let action = Arc::new(action(&sink, &revalidator));

        let start = Instant::now();
        let task = tokio::spawn({
            let action = Arc::clone(&action);
            async move {
                let submission = FeedbackSubmission::new("Ann", "Hi").unwrap();
                action.invoke(submission).await
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sink.is_empty(), "nothing logged during the delay");

        task.await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_page_path() {
        let sink = MemorySink::new();
        let revalidator = Revalidator::default();
        let mut rx = revalidator.subscribe();
        let action = action(&sink, &revalidator).with_page_path("/elsewhere");
        assert_eq!(action.page_path(), "/elsewhere");

        action
            .invoke(FeedbackSubmission::new("Ann", "Hi").unwrap())
            .await;

        assert_eq!(rx.try_recv().unwrap(), Invalidation::path("/elsewhere"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitter_maps_to_confirmation() {
        let sink = MemorySink::new();
        let revalidator = Revalidator::default();
        let action = action(&sink, &revalidator);

        let result = action
            .submit(FeedbackSubmission::new("Ann", "Hi").unwrap())
            .await;

        assert!(result.is_success());
        assert_eq!(result.display_message, confirmation("Ann"));
    }
}
