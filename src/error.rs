/// Error type for cache store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// A cache operation failed.
    #[error("[{tier}] cache error for key '{key}': {message}")]
    Operation {
        tier: String,
        key: String,
        message: String,
    },
    /// The store could not be reached or configured.
    #[error("[{tier}] cache connection error: {message}")]
    Connection { tier: String, message: String },
}

impl CacheError {
    /// Create a new operation error.
    pub fn operation(
        tier: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CacheError::Operation {
            tier: tier.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new connection error.
    pub fn connection(tier: impl Into<String>, message: impl Into<String>) -> Self {
        CacheError::Connection {
            tier: tier.into(),
            message: message.into(),
        }
    }
}

/// Error type for calls to the upstream dictionary provider.
///
/// Every variant carries the endpoint that failed (`definition` or `random`)
/// so a log line alone is enough to tell which call broke.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("upstream {endpoint} request failed: {message}")]
    Request {
        endpoint: &'static str,
        message: String,
    },
    /// The provider answered with a non-success status.
    #[error("upstream {endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    /// The response body did not match the wire contract.
    #[error("upstream {endpoint} returned a malformed body: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
    /// The random-word endpoint returned no usable candidate.
    #[error("upstream random returned no candidate words")]
    EmptyCandidates,
    /// The provider client could not be built.
    #[error("upstream configuration error: {0}")]
    Configuration(String),
}

/// Error returned by the lookup operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    /// The caller supplied an empty or malformed word. No collaborator was contacted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The cache store failed in a way the lookup could not absorb.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The upstream provider failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Neither the cache nor the provider has a definition for the word.
    #[error("no definition found for '{key}'")]
    NotFound { key: String },
}

impl LookupError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        LookupError::InvalidInput(message.into())
    }

    /// Short, stable name of the error kind, used in logs and response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::InvalidInput(_) => "invalid_input",
            LookupError::Cache(_) => "cache_error",
            LookupError::Upstream(_) => "upstream_error",
            LookupError::NotFound { .. } => "not_found",
        }
    }
}

/// Lookup result type.
pub type LookupResult<T> = Result<T, LookupError>;
