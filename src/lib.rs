//! word-cache - A cache-aside dictionary lookup service
//!
//! This library provides:
//! - Definition lookups served from a cache store, falling back to an upstream
//!   dictionary provider on miss and writing the result back with a fixed ttl
//! - Random-word lookups that pick a word upstream and resolve it the same way
//! - Redis and in-process (Moka) cache stores
//! - Injected metrics sinks instead of global counters
//! - An axum HTTP surface and layered settings for the `word-cache` binary
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use word_cache::{
//!     DefinitionResolver, HttpProvider, HttpProviderConfig, RandomWordOrchestrator,
//!     RedisStore, RedisStoreConfig, TracingSink,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(RedisStore::new(RedisStoreConfig::new("redis://localhost:6379")).await?);
//!     let upstream = Arc::new(HttpProvider::new(HttpProviderConfig {
//!         dictionary_url: "https://api.api-ninjas.com/v1/dictionary".to_string(),
//!         random_url: "https://api.api-ninjas.com/v1/randomword".to_string(),
//!         api_key: std::env::var("API_KEY")?,
//!         timeout: Duration::from_secs(10),
//!     })?);
//!
//!     let resolver = DefinitionResolver::new(store, upstream, Arc::new(TracingSink), Duration::from_secs(3600));
//!     let apple = resolver.resolve("apple").await?;
//!     println!("{} ({:?})", apple.definition.as_str(), apple.source);
//!
//!     let random = RandomWordOrchestrator::new(resolver).resolve_random().await?;
//!     println!("{}: {}", random.word, random.resolution.definition.as_str());
//!     Ok(())
//! }
//! ```

mod entry;
mod error;
mod key;
pub mod metrics;
pub mod providers;
mod random;
mod resolver;
pub mod server;
pub mod settings;
mod store;
pub mod stores;
mod upstream;
mod utils;

// Re-export public API
pub use entry::{Definition, RandomResolution, Resolution, Source};
pub use error::{CacheError, LookupError, LookupResult, UpstreamError};
pub use key::{LookupKey, MAX_KEY_CHARS};
pub use metrics::{ErrorStage, MetricsSink, NoopSink, Operation, TracingSink};
pub use providers::http::{HttpProvider, HttpProviderConfig};
pub use random::RandomWordOrchestrator;
pub use resolver::DefinitionResolver;
pub use server::AppState;
pub use settings::{CacheBackend, Settings, SettingsError};
pub use store::Store;
pub use stores::moka::{MokaStore, MokaStoreConfig};
pub use stores::redis::{RedisStore, RedisStoreConfig};
pub use upstream::Upstream;
