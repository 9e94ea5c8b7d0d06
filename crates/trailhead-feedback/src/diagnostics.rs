//! Diagnostic log collaborator.
//!
//! Handlers receive their sink explicitly instead of writing to a
//! process-wide stream, which lets tests capture what a handler emitted.

use std::sync::{Arc, Mutex, PoisonError};

use crate::submission::FeedbackSubmission;

/// One diagnostic line with its structured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl DiagnosticEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// The entry emitted when the feedback action receives a submission.
    pub fn feedback_received(submission: &FeedbackSubmission) -> Self {
        Self::new("Feedback received")
            .field("name", submission.name())
            .field("message", submission.message())
    }

    /// Looks up a field value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Destination for diagnostic entries.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, entry: DiagnosticEntry);
}

/// Forwards entries to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, entry: DiagnosticEntry) {
        tracing::info!(
            target: "trailhead::diagnostics",
            fields = ?entry.fields,
            "{}",
            entry.message
        );
    }
}

/// Keeps entries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<DiagnosticEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, entry: DiagnosticEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_entries() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.record(DiagnosticEntry::new("first").field("k", "v"));
        sink.record(DiagnosticEntry::new("second"));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].get("k"), Some("v"));
        assert_eq!(entries[1].message, "second");
    }

    #[test]
    fn test_memory_sink_clones_share_storage() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        handle.record(DiagnosticEntry::new("shared"));

        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_feedback_entry_carries_both_fields() {
        let submission = FeedbackSubmission::new("Ann", "Hi").unwrap();
        let entry = DiagnosticEntry::feedback_received(&submission);

        assert_eq!(entry.message, "Feedback received");
        assert_eq!(entry.get("name"), Some("Ann"));
        assert_eq!(entry.get("message"), Some("Hi"));
        assert_eq!(entry.get("missing"), None);
    }
}
