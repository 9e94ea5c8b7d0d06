//! Trailhead site server.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use trailhead_config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::new().load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        version = trailhead_site::BUILD_VERSION,
        bind_address = %config.server.bind_address,
        posts_api = %config.posts.api_base,
        "Starting Trailhead"
    );

    trailhead_site::serve(&config).await
}
