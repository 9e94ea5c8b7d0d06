//! Configuration management for Trailhead
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (TRAILHEAD_* prefix, `__` between section and key)
//! 2. trailhead.local.toml (gitignored, local overrides)
//! 3. trailhead.toml (git-tracked, project config)
//! 4. ~/.config/trailhead/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main Trailhead configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailheadConfig {
    pub server: ServerConfig,
    pub feedback: FeedbackConfig,
    pub posts: PostsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Simulated persistence delay of the form action.
    pub action_latency_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            action_latency_ms: 500,
        }
    }
}

impl FeedbackConfig {
    pub fn action_latency(&self) -> Duration {
        Duration::from_millis(self.action_latency_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    pub api_base: String,
    pub limit: u32,
    pub revalidate_secs: u64,
    pub timeout_secs: u64,
    /// Artificial delay before rendering the posts list.
    pub render_delay_ms: u64,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://jsonplaceholder.typicode.com".to_string(),
            limit: 5,
            revalidate_secs: 60,
            timeout_secs: 10,
            render_delay_ms: 1000,
        }
    }
}

impl PostsConfig {
    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl TrailheadConfig {
    /// Create a configuration for local development: no artificial delays
    /// on the posts page.
    pub fn development() -> Self {
        Self {
            posts: PostsConfig {
                render_delay_ms: 0,
                ..Default::default()
            },
            logging: LoggingConfig {
                filter: "debug".to_string(),
            },
            ..Default::default()
        }
    }

    /// Parsed bind address.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "server.bind_address is not a socket address: {}",
                self.server.bind_address
            ))
        })
    }

    /// Reject values the site cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;

        if self.posts.limit == 0 {
            return Err(ConfigError::ValidationError(
                "posts.limit must be at least 1".to_string(),
            ));
        }

        if !(self.posts.api_base.starts_with("http://")
            || self.posts.api_base.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "posts.api_base must be an http(s) URL: {}",
                self.posts.api_base
            )));
        }

        Ok(())
    }
}
