//! Askama Templates
//!
//! Template structs for rendering HTML pages.

use askama::Template;
use askama_web::WebTemplate;
use chrono::{DateTime, Utc};
use trailhead_feedback::{FormFields, FormState, Tone};

use crate::{
    BUILD_VERSION, iso8601,
    lessons::{LESSONS, Lesson},
    posts::{CacheMode, FetchedPosts, Post},
};

/// A link in the lesson navigation bar.
pub struct NavLink {
    pub title: &'static str,
    pub href: String,
    pub is_active: bool,
}

/// Navigation bar with `active` highlighted.
pub fn nav_links(active: &Lesson) -> Vec<NavLink> {
    LESSONS
        .iter()
        .map(|lesson| NavLink {
            title: lesson.nav_title,
            href: lesson.href(),
            is_active: lesson.slug == active.slug,
        })
        .collect()
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub lessons: &'static [Lesson],
    /// Build version for cache busting static assets.
    pub v: &'static str,
}

impl HomeTemplate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lessons: &LESSONS,
            v: BUILD_VERSION,
        }
    }
}

/// Lesson 1: routing.
#[derive(Template, WebTemplate)]
#[template(path = "lessons/routing.html")]
pub struct RoutingTemplate {
    pub title: String,
    pub nav: Vec<NavLink>,
    pub v: &'static str,
}

impl RoutingTemplate {
    pub fn new(lesson: &Lesson) -> Self {
        Self {
            title: lesson.title.to_string(),
            nav: nav_links(lesson),
            v: BUILD_VERSION,
        }
    }
}

/// Lesson 2: server vs client rendering.
#[derive(Template, WebTemplate)]
#[template(path = "lessons/server-client.html")]
pub struct ServerClientTemplate {
    pub title: String,
    pub nav: Vec<NavLink>,
    /// Time this response was rendered.
    pub server_time: String,
    pub count: u64,
    pub next_count: u64,
    pub v: &'static str,
}

impl ServerClientTemplate {
    pub fn new(lesson: &Lesson, rendered_at: DateTime<Utc>, count: u64) -> Self {
        Self {
            title: lesson.title.to_string(),
            nav: nav_links(lesson),
            server_time: rendered_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            count,
            next_count: count.saturating_add(1),
            v: BUILD_VERSION,
        }
    }
}

/// A cache-mode switch on the data-fetching page.
pub struct ModeLink {
    pub key: &'static str,
    pub label: &'static str,
    pub is_active: bool,
}

/// Lesson 3: data fetching.
#[derive(Template, WebTemplate)]
#[template(path = "lessons/data-fetching.html")]
pub struct DataFetchingTemplate {
    pub title: String,
    pub nav: Vec<NavLink>,
    pub modes: Vec<ModeLink>,
    pub mode: &'static str,
    pub posts: Vec<Post>,
    pub fetched_at: String,
    pub from_cache: bool,
    /// Shown instead of the list when the fetch failed.
    pub error: Option<String>,
    pub v: &'static str,
}

impl DataFetchingTemplate {
    pub fn new(lesson: &Lesson, mode: CacheMode, fetched: Result<FetchedPosts, String>) -> Self {
        let modes = [
            ("no-store", "Dynamic (no-store)"),
            ("force-cache", "Static (force-cache)"),
            ("revalidate", "Revalidate"),
        ]
        .into_iter()
        .map(|(key, label)| ModeLink {
            key,
            label,
            is_active: key == mode.key(),
        })
        .collect();

        let (posts, fetched_at, from_cache, error) = match fetched {
            Ok(fetched) => (
                fetched.posts.to_vec(),
                iso8601(fetched.fetched_at),
                fetched.from_cache,
                None,
            ),
            Err(message) => (Vec::new(), String::new(), false, Some(message)),
        };

        Self {
            title: lesson.title.to_string(),
            nav: nav_links(lesson),
            modes,
            mode: mode.key(),
            posts,
            fetched_at,
            from_cache,
            error,
            v: BUILD_VERSION,
        }
    }
}

/// Color-coded result block under the feedback form.
pub struct StatusBlock {
    pub class: &'static str,
    pub message: String,
}

impl StatusBlock {
    pub fn from_state(state: &FormState) -> Option<Self> {
        Some(Self {
            class: state.tone()?.css_class(),
            message: state.message()?.to_string(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            class: Tone::Error.css_class(),
            message: message.into(),
        }
    }
}

/// Lesson 4: API routes and server actions, with the feedback form.
#[derive(Template, WebTemplate)]
#[template(path = "lessons/api-server-actions.html")]
pub struct ApiServerActionsTemplate {
    pub title: String,
    pub nav: Vec<NavLink>,
    pub status: Option<StatusBlock>,
    pub fields: FormFields,
    pub rendered_at: String,
    pub v: &'static str,
}

impl ApiServerActionsTemplate {
    pub fn new(
        lesson: &Lesson,
        status: Option<StatusBlock>,
        fields: FormFields,
        rendered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: lesson.title.to_string(),
            nav: nav_links(lesson),
            status,
            fields,
            rendered_at: iso8601(rendered_at),
            v: BUILD_VERSION,
        }
    }
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub title: String,
    pub v: &'static str,
}

impl NotFoundTemplate {
    pub fn new() -> Self {
        Self {
            title: "Page not found".to_string(),
            v: BUILD_VERSION,
        }
    }
}

impl Default for NotFoundTemplate {
    fn default() -> Self {
        Self::new()
    }
}
