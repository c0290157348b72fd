use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};

use crate::error::CacheError;
use crate::store::Store;

/// Configuration for MokaStore.
#[derive(Debug, Clone)]
pub struct MokaStoreConfig {
    /// Maximum number of entries the cache can hold.
    pub max_capacity: u64,
}

impl Default for MokaStoreConfig {
    fn default() -> Self {
        MokaStoreConfig {
            max_capacity: 10_000,
        }
    }
}

#[derive(Clone)]
struct Slot {
    value: String,
    ttl: Duration,
    inserted_at: Instant,
}

/// Expires each slot after the ttl it was written with.
struct SlotExpiry;

impl Expiry<String, Slot> for SlotExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        slot: &Slot,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(slot.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        slot: &Slot,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(slot.ttl)
    }
}

/// In-process cache store using Moka.
///
/// Useful for running the service without Redis and for tests. Entries are
/// not shared between processes.
pub struct MokaStore {
    cache: Cache<String, Slot>,
}

impl MokaStore {
    /// Create a new MokaStore with the given configuration.
    pub fn new(config: MokaStoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(SlotExpiry)
            .build();

        MokaStore { cache }
    }

    /// Time left before `key` expires, or `None` if it is not cached.
    pub async fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let slot = self.cache.get(key).await?;
        slot.ttl.checked_sub(slot.inserted_at.elapsed())
    }
}

#[async_trait]
impl Store for MokaStore {
    fn name(&self) -> &'static str {
        "moka"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.cache.get(key).await.map(|slot| slot.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let slot = Slot {
            value: value.to_string(),
            ttl,
            inserted_at: Instant::now(),
        };
        self.cache.insert(key.to_string(), slot).await;

        Ok(())
    }
}
