//! Posts API client for the data-fetching lesson.
//!
//! Fetches a handful of posts from a JSONPlaceholder-compatible API and
//! demonstrates the three cache modes the lesson teaches.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;

/// A post record as served by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// How a fetch may reuse earlier results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Always go to the network.
    NoStore,
    /// Reuse the first successful result indefinitely.
    ForceCache,
    /// Reuse a result while it is younger than the window.
    Revalidate(Duration),
}

impl CacheMode {
    /// Parses the `mode` query parameter; anything unrecognised is `NoStore`.
    pub fn from_query(mode: Option<&str>, revalidate_after: Duration) -> Self {
        match mode {
            Some("force-cache") => Self::ForceCache,
            Some("revalidate") => Self::Revalidate(revalidate_after),
            _ => Self::NoStore,
        }
    }

    /// Query value selecting this mode.
    pub fn key(self) -> &'static str {
        match self {
            Self::NoStore => "no-store",
            Self::ForceCache => "force-cache",
            Self::Revalidate(_) => "revalidate",
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to posts API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("posts API responded with status {0}")]
    Status(reqwest::StatusCode),
}

/// Result of a fetch, possibly served from cache.
#[derive(Debug, Clone)]
pub struct FetchedPosts {
    pub posts: Arc<[Post]>,
    pub fetched_at: DateTime<Utc>,
    pub from_cache: bool,
}

#[derive(Debug)]
struct CachedPosts {
    posts: Arc<[Post]>,
    fetched_at: DateTime<Utc>,
    stored: Instant,
}

/// HTTP client for the posts collaborator.
#[derive(Debug, Clone)]
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
    limit: u32,
    cache: Arc<Mutex<Option<CachedPosts>>>,
}

impl PostsClient {
    pub fn new(
        base_url: impl Into<String>,
        limit: u32,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit,
            cache: Arc::new(Mutex::new(None)),
        })
    }

    pub fn posts_url(&self) -> String {
        format!("{}/posts?_limit={}", self.base_url, self.limit)
    }

    /// Fetches posts, honouring `mode`.
    pub async fn fetch(&self, mode: CacheMode) -> Result<FetchedPosts, FetchError> {
        if let Some(hit) = self.cached(mode) {
            tracing::debug!(mode = mode.key(), "Serving posts from cache");
            return Ok(hit);
        }

        let posts = self.fetch_remote().await?;
        let fetched_at = Utc::now();

        if mode != CacheMode::NoStore {
            *self.lock_cache() = Some(CachedPosts {
                posts: Arc::clone(&posts),
                fetched_at,
                stored: Instant::now(),
            });
        }

        Ok(FetchedPosts {
            posts,
            fetched_at,
            from_cache: false,
        })
    }

    fn cached(&self, mode: CacheMode) -> Option<FetchedPosts> {
        let cache = self.lock_cache();
        let entry = cache.as_ref()?;

        let fresh = match mode {
            CacheMode::NoStore => false,
            CacheMode::ForceCache => true,
            CacheMode::Revalidate(window) => entry.stored.elapsed() < window,
        };

        fresh.then(|| FetchedPosts {
            posts: Arc::clone(&entry.posts),
            fetched_at: entry.fetched_at,
            from_cache: true,
        })
    }

    async fn fetch_remote(&self) -> Result<Arc<[Post]>, FetchError> {
        let url = self.posts_url();
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let posts: Vec<Post> = response.json().await?;
        tracing::info!(url = %url, count = posts.len(), "Fetched posts");
        Ok(posts.into())
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<CachedPosts>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
