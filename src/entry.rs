use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::key::LookupKey;

/// The meaning of a word, as a single string.
///
/// The provider's richer payload is collapsed to this one field. An empty or
/// whitespace-only definition is still a valid definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definition(String);

impl Definition {
    pub fn new(text: impl Into<String>) -> Self {
        Definition(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Definition {
    fn from(text: String) -> Self {
        Definition(text)
    }
}

/// Where a resolved definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Read from the cache store.
    Cache,
    /// Fetched from the upstream provider during this resolution.
    Upstream,
}

/// Outcome of a successful definition lookup.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The normalized key the definition is stored under.
    pub key: LookupKey,
    pub definition: Definition,
    pub source: Source,
    /// Set when the definition came from upstream but writing it to the
    /// cache failed. The lookup itself still succeeded.
    pub cache_write_error: Option<CacheError>,
}

impl Resolution {
    pub(crate) fn from_cache(key: LookupKey, definition: Definition) -> Self {
        Resolution {
            key,
            definition,
            source: Source::Cache,
            cache_write_error: None,
        }
    }

    pub(crate) fn from_upstream(
        key: LookupKey,
        definition: Definition,
        cache_write_error: Option<CacheError>,
    ) -> Self {
        Resolution {
            key,
            definition,
            source: Source::Upstream,
            cache_write_error,
        }
    }
}

/// Outcome of a random-word lookup: the chosen word and its definition.
#[derive(Debug, Clone)]
pub struct RandomResolution {
    pub word: LookupKey,
    pub resolution: Resolution,
}
