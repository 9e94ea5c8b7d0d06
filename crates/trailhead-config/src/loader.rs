//! Configuration loader with multi-source merging

use crate::{Paths, TrailheadConfig};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "TRAILHEAD".to_string(),
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "TRAILHEAD")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/trailhead/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<TrailheadConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = TrailheadConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/trailhead/config.toml)
        if self.include_user_config {
            if let Ok(user_config_file) = Paths::new().user_config_file() {
                if user_config_file.exists() {
                    builder = builder.add_source(
                        config::File::from(user_config_file)
                            .required(false)
                            .format(config::FileFormat::Toml),
                    );
                }
            }
        }

        // 3. Project config (trailhead.toml)
        let project_config_file = Paths::project_config_file(&self.project_dir);
        if project_config_file.exists() {
            builder = builder.add_source(
                config::File::from(project_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 4. Local config (trailhead.local.toml, gitignored)
        let local_config_file = Paths::local_config_file(&self.project_dir);
        if local_config_file.exists() {
            builder = builder.add_source(
                config::File::from(local_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Environment variables (TRAILHEAD_SERVER__BIND_ADDRESS, ...)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let trailhead_config: TrailheadConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        trailhead_config
            .validate()
            .context("Configuration failed validation")?;

        Ok(trailhead_config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default(self) -> TrailheadConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn loader(dir: &Path) -> ConfigLoader {
        // Unique prefix keeps stray TRAILHEAD_* variables out of the tests
        ConfigLoader::new()
            .with_project_dir(dir)
            .with_env_prefix("TRAILHEAD_LOADER_TEST")
            .without_user_config()
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert_eq!(config.posts.limit, 5);
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[server]
bind_address = "0.0.0.0:8080"

[feedback]
action_latency_ms = 50

[posts]
limit = 3
api_base = "http://localhost:9999"
"#;
        fs::write(project_dir.join("trailhead.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.feedback.action_latency_ms, 50);
        assert_eq!(config.posts.limit, 3);
        assert_eq!(config.posts.api_base, "http://localhost:9999");
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("trailhead.toml"),
            r#"
[server]
bind_address = "127.0.0.1:3000"
"#,
        )
        .expect("Failed to write project config");

        fs::write(
            project_dir.join("trailhead.local.toml"),
            r#"
[server]
bind_address = "127.0.0.1:4000"
"#,
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.server.bind_address, "127.0.0.1:4000");
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("trailhead.toml"),
            "[posts]\nlimit = 0\n",
        )
        .expect("Failed to write config");

        assert!(loader(project_dir).load().is_err());
        assert_eq!(loader(project_dir).load_or_default().posts.limit, 5);
    }

    // Environment variables follow TRAILHEAD_<SECTION>__<KEY>, for example
    // TRAILHEAD_SERVER__BIND_ADDRESS=0.0.0.0:3000 or TRAILHEAD_POSTS__LIMIT=10.
    // They are not exercised here because tests share one process environment.
}
