//! Shared state for the site's HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use trailhead_config::TrailheadConfig;
use trailhead_feedback::{
    DiagnosticSink, FeedbackAction, Revalidator, SimulatedLatency, TracingSink,
};

use crate::page_cache::PageCache;
use crate::posts::{FetchError, PostsClient};

/// Shared state for all site handlers.
#[derive(Debug, Clone)]
pub struct SiteState {
    /// Stale-data notifications published by actions
    pub revalidator: Revalidator,

    /// Rendered pages, invalidated through `revalidator`
    pub pages: PageCache,

    /// Client for the data-fetching lesson's posts API
    pub posts: PostsClient,

    /// Server-side feedback action behind the lesson form
    pub feedback: FeedbackAction,

    /// Window for the `revalidate` posts cache mode
    pub revalidate_after: Duration,

    /// Artificial delay before the posts list renders
    pub posts_render_delay: Duration,
}

impl SiteState {
    /// Builds state from configuration, logging feedback through `tracing`.
    pub fn from_config(config: &TrailheadConfig) -> Result<Self, FetchError> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Builds state with an explicit diagnostic sink for the feedback action.
    pub fn with_sink(
        config: &TrailheadConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, FetchError> {
        let revalidator = Revalidator::default();
        let pages = PageCache::new(&revalidator);
        let posts = PostsClient::new(
            config.posts.api_base.as_str(),
            config.posts.limit,
            config.posts.timeout(),
        )?;
        let feedback = FeedbackAction::with_parts(
            SimulatedLatency::new(config.feedback.action_latency()),
            sink,
            revalidator.clone(),
        );

        Ok(Self {
            revalidator,
            pages,
            posts,
            feedback,
            revalidate_after: config.posts.revalidate_after(),
            posts_render_delay: config.posts.render_delay(),
        })
    }
}
