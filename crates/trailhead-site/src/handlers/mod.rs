//! Route Handlers
//!
//! HTTP request handlers for all routes.

pub mod api;
pub mod feedback;
pub mod home;
pub mod lessons;
