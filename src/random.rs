use std::time::Instant;
use tracing::{debug, error};

use crate::entry::RandomResolution;
use crate::error::{LookupError, LookupResult, UpstreamError};
use crate::key::LookupKey;
use crate::metrics::{ErrorStage, Operation};
use crate::resolver::DefinitionResolver;
use crate::utils::truncate;

/// Picks a random word upstream, then resolves its definition through the
/// cache-aside path.
///
/// One call can cost two upstream requests (random word, then definition on
/// a miss) plus a cache round trip. Candidate words themselves are never
/// cached; only their definitions are.
#[derive(Clone)]
pub struct RandomWordOrchestrator {
    resolver: DefinitionResolver,
}

impl RandomWordOrchestrator {
    /// Create an orchestrator sharing the resolver's store, provider and sink.
    pub fn new(resolver: DefinitionResolver) -> Self {
        RandomWordOrchestrator { resolver }
    }

    /// Fetch a random word and resolve its definition.
    ///
    /// Only the first candidate returned by the provider is used.
    pub async fn resolve_random(&self) -> LookupResult<RandomResolution> {
        let start = Instant::now();
        let result = self.resolve_first_candidate().await;
        self.resolver
            .metrics()
            .record_latency(Operation::Random, start.elapsed());

        result
    }

    async fn resolve_first_candidate(&self) -> LookupResult<RandomResolution> {
        let word = match self.pick_candidate().await {
            Ok(word) => word,
            Err(err) => {
                error!(operation = %Operation::Random, error = %err, "random word lookup failed");
                self.resolver
                    .metrics()
                    .record_error(Operation::Random, ErrorStage::Upstream);
                return Err(LookupError::Upstream(err));
            }
        };

        debug!(operation = %Operation::Random, %word, "random candidate chosen");

        let resolution = self
            .resolver
            .resolve_key(word.clone(), Operation::Random)
            .await?;

        Ok(RandomResolution { word, resolution })
    }

    async fn pick_candidate(&self) -> Result<LookupKey, UpstreamError> {
        let candidates = self.resolver.upstream().random_words().await?;

        let first = candidates
            .into_iter()
            .next()
            .ok_or(UpstreamError::EmptyCandidates)?;

        LookupKey::parse(&first).map_err(|e| UpstreamError::Decode {
            endpoint: "random",
            message: format!("unusable candidate '{}': {}", truncate(&first, 32), e),
        })
    }
}
