//! Lesson catalog.
//!
//! Metadata for the four lessons, shared by the home page cards and the
//! lesson navigation bar.

/// One lesson in the learning path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: u8,
    pub slug: &'static str,
    pub title: &'static str,
    /// Short label used in the navigation bar.
    pub nav_title: &'static str,
    pub description: &'static str,
    pub topics: &'static [&'static str],
}

impl Lesson {
    pub fn href(&self) -> String {
        format!("/lessons/{}", self.slug)
    }
}

pub const ROUTING: Lesson = Lesson {
    id: 1,
    slug: "routing",
    title: "App Router & File-based Routing",
    nav_title: "Routing",
    description: "Learn how the file system defines routes, layouts, and pages",
    topics: &[
        "File-based routing",
        "Dynamic routes",
        "Route groups",
        "Layouts",
    ],
};

pub const SERVER_CLIENT: Lesson = Lesson {
    id: 2,
    slug: "server-client",
    title: "Server vs Client Components",
    nav_title: "Server vs Client",
    description: "Understand the difference between Server and Client Components and when to use each",
    topics: &[
        "Server Components (default)",
        "Client Components with 'use client'",
        "When to use each",
        "Component composition",
    ],
};

pub const DATA_FETCHING: Lesson = Lesson {
    id: 3,
    slug: "data-fetching",
    title: "Data Fetching Patterns",
    nav_title: "Data Fetching",
    description: "Master different ways to fetch and cache data on the server",
    topics: &[
        "Server-side data fetching",
        "Streaming and Suspense",
        "Client-side fetching",
        "Caching strategies",
    ],
};

pub const API_SERVER_ACTIONS: Lesson = Lesson {
    id: 4,
    slug: "api-server-actions",
    title: "API Routes & Server Actions",
    nav_title: "API & Server Actions",
    description: "Build backend APIs and handle form submissions with Server Actions",
    topics: &[
        "Route Handlers (API Routes)",
        "Server Actions",
        "Form handling",
        "Revalidation",
    ],
};

/// All lessons in reading order.
pub static LESSONS: [Lesson; 4] = [ROUTING, SERVER_CLIENT, DATA_FETCHING, API_SERVER_ACTIONS];
