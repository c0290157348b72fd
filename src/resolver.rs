use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::entry::{Definition, Resolution};
use crate::error::{LookupError, LookupResult};
use crate::key::LookupKey;
use crate::metrics::{ErrorStage, MetricsSink, Operation};
use crate::store::Store;
use crate::upstream::Upstream;

/// Cache-aside lookup of a single word.
///
/// - Cache hit: return the cached definition, no upstream call
/// - Cache miss: fetch from upstream, write `(key, definition, ttl)`, return it
/// - Cache read error: logged and treated as a miss
/// - Cache write error: logged and attached to the [`Resolution`], never fatal
/// - Upstream error: the lookup fails and nothing is written
///
/// Concurrent misses on the same key are not coalesced; both fetch and both
/// write, and the last write wins.
#[derive(Clone)]
pub struct DefinitionResolver {
    store: Arc<dyn Store>,
    upstream: Arc<dyn Upstream>,
    metrics: Arc<dyn MetricsSink>,
    ttl: Duration,
}

impl DefinitionResolver {
    /// Create a resolver.
    ///
    /// # Arguments
    /// * `store` - The cache store consulted first
    /// * `upstream` - The provider called on cache miss
    /// * `metrics` - Sink for hit/resolved/error/latency events
    /// * `ttl` - Expiry applied to every cache write
    pub fn new(
        store: Arc<dyn Store>,
        upstream: Arc<dyn Upstream>,
        metrics: Arc<dyn MetricsSink>,
        ttl: Duration,
    ) -> Self {
        DefinitionResolver {
            store,
            upstream,
            metrics,
            ttl,
        }
    }

    pub(crate) fn upstream(&self) -> &Arc<dyn Upstream> {
        &self.upstream
    }

    pub(crate) fn metrics(&self) -> &Arc<dyn MetricsSink> {
        &self.metrics
    }

    /// Resolve the definition of a caller-supplied word.
    ///
    /// The word is normalized first; invalid input fails with
    /// [`LookupError::InvalidInput`] before the store or provider is touched.
    pub async fn resolve(&self, word: &str) -> LookupResult<Resolution> {
        let key = LookupKey::parse(word)?;

        let start = Instant::now();
        let result = self.resolve_key(key, Operation::Define).await;
        self.metrics.record_latency(Operation::Define, start.elapsed());

        result
    }

    /// Cache-aside resolution of an already normalized key, with events
    /// tagged by `operation`.
    pub(crate) async fn resolve_key(
        &self,
        key: LookupKey,
        operation: Operation,
    ) -> LookupResult<Resolution> {
        match self.store.get(key.as_str()).await {
            Ok(Some(cached)) => {
                debug!(%operation, %key, store = self.store.name(), "cache hit");
                self.metrics.record_hit(operation);
                return Ok(Resolution::from_cache(key, Definition::from(cached)));
            }
            Ok(None) => {
                debug!(%operation, %key, store = self.store.name(), "cache miss");
            }
            Err(err) => {
                warn!(%operation, %key, error = %err, "cache read failed, treating as miss");
                self.metrics.record_error(operation, ErrorStage::CacheRead);
            }
        }

        let definition = match self.upstream.definition(&key).await {
            Ok(Some(definition)) => definition,
            Ok(None) => {
                info!(%operation, %key, upstream = self.upstream.name(), "word not found upstream");
                return Err(LookupError::NotFound {
                    key: key.into_inner(),
                });
            }
            Err(err) => {
                error!(%operation, %key, upstream = self.upstream.name(), error = %err, "upstream lookup failed");
                self.metrics.record_error(operation, ErrorStage::Upstream);
                return Err(err.into());
            }
        };

        let cache_write_error = match self
            .store
            .set(key.as_str(), definition.as_str(), self.ttl)
            .await
        {
            Ok(()) => None,
            Err(err) => {
                warn!(%operation, %key, error = %err, "cache write failed, returning upstream definition");
                self.metrics.record_error(operation, ErrorStage::CacheWrite);
                Some(err)
            }
        };

        debug!(%operation, %key, "resolved from upstream");
        self.metrics.record_resolved(operation);

        Ok(Resolution::from_upstream(key, definition, cache_write_error))
    }
}
