use async_trait::async_trait;

use crate::entry::Definition;
use crate::error::UpstreamError;
use crate::key::LookupKey;

/// The authoritative dictionary service behind the cache.
///
/// Every call may fail or be slow. Implementations must not retry on their
/// own; the resolver treats each failure as final for the request.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// A name for logs.
    fn name(&self) -> &'static str;

    /// Fetch the definition of `key`.
    ///
    /// Returns `Ok(None)` only when the provider explicitly reports that the
    /// word does not exist.
    async fn definition(&self, key: &LookupKey) -> Result<Option<Definition>, UpstreamError>;

    /// Fetch candidate random words, in provider order.
    ///
    /// The sequence may be empty; callers decide what that means.
    async fn random_words(&self) -> Result<Vec<String>, UpstreamError>;
}
