//! Stale-data notifications for rendered pages.
//!
//! A mutation publishes an [`Invalidation`]; whoever caches rendered output
//! subscribes and drops the matching entries before serving them again.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Identifies cached output that is no longer fresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "camelCase")]
pub enum Invalidation {
    /// Everything rendered for a request path.
    Path(String),
    /// Everything rendered under a tag.
    Tag(String),
}

impl Invalidation {
    /// Builds a path invalidation, ignoring a trailing slash.
    pub fn path(path: impl AsRef<str>) -> Self {
        Self::Path(normalize_path(path.as_ref()))
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Whether output rendered for `path` under `tags` is covered.
    pub fn matches(&self, path: &str, tags: &[String]) -> bool {
        match self {
            Self::Path(p) => *p == normalize_path(path),
            Self::Tag(t) => tags.iter().any(|tag| tag == t),
        }
    }
}

/// Strips a trailing slash, keeping the root path intact.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Publishes invalidations to every subscribed cache.
#[derive(Debug, Clone)]
pub struct Revalidator {
    tx: broadcast::Sender<Invalidation>,
}

impl Revalidator {
    /// Creates a revalidator buffering up to `buffer_size` notifications per
    /// subscriber.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _rx) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Sends an invalidation to all subscribers.
    ///
    /// Returns the number of subscribers that will observe it. Publishing
    /// with no subscribers is not an error.
    pub fn send(&self, invalidation: Invalidation) -> usize {
        tracing::debug!(?invalidation, "Publishing invalidation");
        self.tx.send(invalidation).unwrap_or_default()
    }

    pub fn revalidate_path(&self, path: impl AsRef<str>) -> usize {
        self.send(Invalidation::path(path))
    }

    pub fn revalidate_tag(&self, tag: impl Into<String>) -> usize {
        self.send(Invalidation::tag(tag))
    }

    /// Subscribes to invalidations published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Revalidator {
    fn default() -> Self {
        Self::new(64)
    }
}
