//! # HTTP dictionary provider
//!
//! Talks to an API-Ninjas style dictionary service:
//!
//! - `GET {dictionary_url}?word={word}` -> `{"definition": "...", "valid": true}`
//! - `GET {random_url}` -> `{"word": ["...", ...]}`
//!
//! Both calls carry the API credential in the `X-API-KEY` header and go
//! through the same fetch-and-decode routine. A word is absent only when a
//! successful response says `"valid": false`; every non-2xx status, 404
//! included, is an [`UpstreamError::Status`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::entry::Definition;
use crate::error::UpstreamError;
use crate::key::LookupKey;
use crate::upstream::Upstream;
use crate::utils::truncate;

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

const DEFINITION_ENDPOINT: &str = "definition";
const RANDOM_ENDPOINT: &str = "random";

/// Longest slice of an error response body kept in [`UpstreamError::Status`].
const ERROR_BODY_CHARS: usize = 256;

/// Configuration for the HTTP provider.
#[derive(Clone)]
pub struct HttpProviderConfig {
    /// Base URL of the definition endpoint; `word` is added as a query parameter.
    pub dictionary_url: String,
    /// URL of the random-word endpoint.
    pub random_url: String,
    /// Value sent in the `X-API-KEY` header.
    pub api_key: String,
    /// Transport timeout for a single request.
    pub timeout: Duration,
}

impl fmt::Debug for HttpProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProviderConfig")
            .field("dictionary_url", &self.dictionary_url)
            .field("random_url", &self.random_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct DefinitionBody {
    definition: String,
    /// Absent on older responses; only an explicit `false` means "no such word".
    #[serde(default)]
    valid: Option<bool>,
}

#[derive(Deserialize)]
struct RandomBody {
    word: Candidates,
}

/// The random endpoint has been seen returning both a list and a bare string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Candidates {
    Many(Vec<String>),
    One(String),
}

impl Candidates {
    fn into_vec(self) -> Vec<String> {
        match self {
            Candidates::Many(words) => words,
            Candidates::One(word) => vec![word],
        }
    }
}

/// reqwest-backed [`Upstream`] implementation.
pub struct HttpProvider {
    client: Client,
    dictionary_url: Url,
    random_url: Url,
}

impl fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProvider")
            .field("dictionary_url", &self.dictionary_url.as_str())
            .field("random_url", &self.random_url.as_str())
            .finish()
    }
}

impl HttpProvider {
    /// Build the provider and its HTTP client.
    ///
    /// Fails with [`UpstreamError::Configuration`] for unparseable URLs or an
    /// API key that is not a valid header value.
    pub fn new(config: HttpProviderConfig) -> Result<Self, UpstreamError> {
        let dictionary_url = parse_url("dictionary_url", &config.dictionary_url)?;
        let random_url = parse_url("random_url", &config.random_url)?;

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| UpstreamError::Configuration(format!("Invalid API key: {}", e)))?;
        api_key.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("word-cache/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                UpstreamError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "Created HttpProvider: dictionary_url={}, random_url={}, timeout={}ms",
            dictionary_url,
            random_url,
            config.timeout.as_millis()
        );

        Ok(HttpProvider {
            client,
            dictionary_url,
            random_url,
        })
    }

    /// Issue a GET and decode a successful JSON body into `T`.
    async fn fetch<T>(
        &self,
        endpoint: &'static str,
        url: &Url,
        query: &[(&str, &str)],
    ) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Request {
                endpoint,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_CHARS),
            });
        }

        let bytes = response.bytes().await.map_err(|e| UpstreamError::Request {
            endpoint,
            message: e.to_string(),
        })?;

        debug!(endpoint, bytes = bytes.len(), "upstream response received");

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, UpstreamError> {
    Url::parse(raw)
        .map_err(|e| UpstreamError::Configuration(format!("Invalid {} '{}': {}", field, raw, e)))
}

#[async_trait]
impl Upstream for HttpProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn definition(&self, key: &LookupKey) -> Result<Option<Definition>, UpstreamError> {
        let body = self
            .fetch::<DefinitionBody>(
                DEFINITION_ENDPOINT,
                &self.dictionary_url,
                &[("word", key.as_str())],
            )
            .await?;

        if body.valid == Some(false) {
            debug!(%key, "upstream reports word as unknown");
            return Ok(None);
        }
        Ok(Some(Definition::from(body.definition)))
    }

    async fn random_words(&self) -> Result<Vec<String>, UpstreamError> {
        let body = self
            .fetch::<RandomBody>(RANDOM_ENDPOINT, &self.random_url, &[])
            .await?;
        Ok(body.word.into_vec())
    }
}
