//! word-cache service binary.
//!
//! Wires settings into a cache store, the HTTP dictionary provider and a
//! tracing metrics sink, then serves the lookup routes until Ctrl+C.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use word_cache::{
    AppState, CacheBackend, DefinitionResolver, HttpProvider, MokaStore, RedisStore, Settings,
    Store, TracingSink, server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("word_cache=info,word_cache::metrics=warn,tower_http=debug")
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting word-cache...");

    let settings = Settings::load().context("failed to load settings")?;
    info!(
        "Settings loaded: backend={:?}, ttl={}s",
        settings.cache.backend, settings.cache.ttl_secs
    );

    let store: Arc<dyn Store> = match settings.cache.backend {
        CacheBackend::Redis => {
            info!("Connecting to Redis...");
            Arc::new(
                RedisStore::new(settings.redis_config())
                    .await
                    .context("failed to connect to Redis")?,
            )
        }
        CacheBackend::Memory => Arc::new(MokaStore::new(settings.moka_config())),
    };

    let upstream = Arc::new(
        HttpProvider::new(settings.provider_config())
            .context("failed to build upstream provider")?,
    );

    let resolver = DefinitionResolver::new(store, upstream, Arc::new(TracingSink), settings.ttl());

    let listener = TcpListener::bind(settings.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr()))?;

    server::serve(listener, AppState::new(resolver), shutdown_signal()).await?;

    info!("word-cache stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
