//! Rendered-page cache keyed by request path.
//!
//! The cache subscribes to a [`Revalidator`] and applies pending
//! invalidations before every lookup, so a page marked stale is rendered
//! again on its next request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{Receiver, error::TryRecvError};
use trailhead_feedback::{Invalidation, Revalidator, normalize_path};

/// A cached rendering.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub html: Arc<str>,
    pub tags: Vec<String>,
    pub rendered_at: DateTime<Utc>,
}

/// Result of [`PageCache::get_or_render`].
#[derive(Debug, Clone)]
pub enum Lookup {
    Hit(CachedPage),
    Rendered(CachedPage),
}

impl Lookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn page(&self) -> &CachedPage {
        match self {
            Self::Hit(page) | Self::Rendered(page) => page,
        }
    }

    pub fn into_page(self) -> CachedPage {
        match self {
            Self::Hit(page) | Self::Rendered(page) => page,
        }
    }
}

/// Shared cache of rendered HTML.
#[derive(Debug, Clone)]
pub struct PageCache {
    entries: Arc<Mutex<HashMap<String, CachedPage>>>,
    invalidations: Arc<Mutex<Receiver<Invalidation>>>,
}

impl PageCache {
    pub fn new(revalidator: &Revalidator) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            invalidations: Arc::new(Mutex::new(revalidator.subscribe())),
        }
    }

    /// Returns the cached page for `path`, if still fresh.
    pub fn get(&self, path: &str) -> Option<CachedPage> {
        self.apply_invalidations();
        self.lock_entries().get(&normalize_path(path)).cloned()
    }

    pub fn insert(&self, path: &str, tags: &[&str], html: impl Into<Arc<str>>) -> CachedPage {
        let page = CachedPage {
            html: html.into(),
            tags: tags.iter().map(ToString::to_string).collect(),
            rendered_at: Utc::now(),
        };
        self.lock_entries()
            .insert(normalize_path(path), page.clone());
        page
    }

    /// Serves `path` from cache or renders and stores it.
    pub fn get_or_render<E>(
        &self,
        path: &str,
        tags: &[&str],
        render: impl FnOnce() -> Result<String, E>,
    ) -> Result<Lookup, E> {
        if let Some(page) = self.get(path) {
            tracing::debug!(path, "Page cache hit");
            return Ok(Lookup::Hit(page));
        }

        let html = render()?;
        tracing::debug!(path, "Page rendered");
        Ok(Lookup::Rendered(self.insert(path, tags, html)))
    }

    pub fn len(&self) -> usize {
        self.apply_invalidations();
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply_invalidations(&self) {
        let mut rx = self
            .invalidations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        loop {
            match rx.try_recv() {
                Ok(invalidation) => {
                    let mut entries = self.lock_entries();
                    let before = entries.len();
                    entries.retain(|path, page| !invalidation.matches(path, &page.tags));
                    tracing::debug!(
                        ?invalidation,
                        dropped = before - entries.len(),
                        "Applied invalidation"
                    );
                }
                Err(TryRecvError::Lagged(missed)) => {
                    // Unknown which pages the missed notifications covered
                    tracing::warn!(missed, "Page cache lagged behind invalidations");
                    self.lock_entries().clear();
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedPage>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
