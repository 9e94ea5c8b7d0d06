//! Feedback submission flow for the Trailhead learning site.
//!
//! Two cooperating pieces:
//!
//! - [`FeedbackForm`]: the form controller. Owns the input fields and the
//!   `Idle → Pending → Success | Error` view state, and allows one submission
//!   in flight per instance.
//! - [`FeedbackAction`]: the direct-invocation handler. Waits on a
//!   [`Latency`], records the submission through a [`DiagnosticSink`] and
//!   publishes a stale-data [`Invalidation`] for the page it serves.
//!
//! Collaborators are passed in explicitly so tests can capture log entries,
//! observe invalidations and control time.

pub mod action;
pub mod diagnostics;
pub mod form;
pub mod latency;
pub mod revalidate;
pub mod submission;


pub use action::{DEFAULT_PAGE_PATH, FeedbackAction};
pub use diagnostics::{DiagnosticEntry, DiagnosticSink, MemorySink, TracingSink};
pub use form::{
    FeedbackForm, FormFields, FormState, SimulatedSubmitter, SubmitError, Submitter, Tone,
};
pub use latency::{ACTION_LATENCY, FORM_LATENCY, Latency, SimulatedLatency};
pub use revalidate::{Invalidation, Revalidator, normalize_path};
pub use submission::{
    ActionResponse, FeedbackSubmission, Field, FieldError, Outcome, SUBMITTED_MESSAGE,
    SubmissionResult, confirmation,
};
