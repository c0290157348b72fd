use async_trait::async_trait;
use std::time::Duration;

use crate::error::CacheError;

/// A store is a common interface for reading and writing definitions by word.
///
/// The store implementation is responsible for expiring entries on its own.
/// The resolver never deletes anything.
#[async_trait]
pub trait Store: Send + Sync {
    /// A name for logs and errors.
    ///
    /// # Example
    /// - "redis"
    /// - "moka"
    fn name(&self) -> &'static str;

    /// Return the cached value.
    ///
    /// The response must be `None` for cache misses, including expired entries.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Sets the value for the given key, expiring it after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}
