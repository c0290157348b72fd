//! Integration tests for the HTTP provider and the service routes, using a
//! local axum server as the upstream dictionary.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use word_cache::{
    AppState, DefinitionResolver, HttpProvider, HttpProviderConfig, LookupKey, MokaStore,
    MokaStoreConfig, NoopSink, Upstream, UpstreamError, server,
};

const API_KEY: &str = "test-api-key";

// ============================================================================
// Fake Dictionary Provider
// ============================================================================

#[derive(Debug, Clone)]
struct SeenRequest {
    path: String,
    word: Option<String>,
    api_key: Option<String>,
}

#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<SeenRequest>>>);

impl Seen {
    fn record(&self, path: &str, headers: &HeaderMap, word: Option<String>) {
        self.0.lock().unwrap().push(SeenRequest {
            path: path.to_string(),
            word,
            api_key: headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }

    fn requests(&self) -> Vec<SeenRequest> {
        self.0.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some(API_KEY)
}

async fn dictionary(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let word = params.get("word").cloned();
    seen.record("/v1/dictionary", &headers, word.clone());

    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "missing api key").into_response();
    }

    match word.as_deref() {
        Some("apple") => Json(json!({
            "word": "apple",
            "definition": "a rounded fruit",
            "valid": true
        }))
        .into_response(),
        Some("zephyr") => Json(json!({"definition": "a gentle breeze"})).into_response(),
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        Some("garbled") => (StatusCode::OK, "<html>not json</html>").into_response(),
        Some("shapeless") => Json(json!({"meaning": "no definition field"})).into_response(),
        other => Json(json!({
            "word": other.unwrap_or_default(),
            "definition": "",
            "valid": false
        }))
        .into_response(),
    }
}

async fn random_list(State(seen): State<Seen>, headers: HeaderMap) -> Response {
    seen.record("/v1/randomword", &headers, None);
    Json(json!({"word": ["zephyr", "breeze"]})).into_response()
}

async fn random_single(State(seen): State<Seen>, headers: HeaderMap) -> Response {
    seen.record("/v1/randomword/single", &headers, None);
    Json(json!({"word": "zephyr"})).into_response()
}

async fn random_empty(State(seen): State<Seen>, headers: HeaderMap) -> Response {
    seen.record("/v1/randomword/empty", &headers, None);
    Json(json!({"word": []})).into_response()
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_fake_provider() -> (String, Seen) {
    let seen = Seen::default();
    let router = Router::new()
        .route("/v1/dictionary", get(dictionary))
        .route("/v1/randomword", get(random_list))
        .route("/v1/randomword/single", get(random_single))
        .route("/v1/randomword/empty", get(random_empty))
        .with_state(seen.clone());
    (spawn(router).await, seen)
}

fn provider(base_url: &str, random_path: &str) -> HttpProvider {
    HttpProvider::new(HttpProviderConfig {
        dictionary_url: format!("{}/v1/dictionary", base_url),
        random_url: format!("{}{}", base_url, random_path),
        api_key: API_KEY.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn key(word: &str) -> LookupKey {
    LookupKey::parse(word).unwrap()
}

/// Start the service against the fake provider; the returned sender stops it.
async fn spawn_service(provider_url: &str) -> (String, oneshot::Sender<()>) {
    spawn_service_with(provider(provider_url, "/v1/randomword")).await
}

async fn spawn_service_with(upstream: HttpProvider) -> (String, oneshot::Sender<()>) {
    let store = Arc::new(MokaStore::new(MokaStoreConfig::default()));
    let upstream = Arc::new(upstream);
    let resolver =
        DefinitionResolver::new(store, upstream, Arc::new(NoopSink), Duration::from_secs(60));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        server::serve(listener, AppState::new(resolver), async {
            let _ = stop_rx.await;
        })
        .await
        .unwrap();
    });

    (format!("http://{}", addr), stop_tx)
}

// ============================================================================
// HttpProvider
// ============================================================================

#[tokio::test]
async fn test_definition_sends_word_and_api_key() {
    let (base_url, seen) = spawn_fake_provider().await;
    let provider = provider(&base_url, "/v1/randomword");

    let definition = provider.definition(&key("apple")).await.unwrap();

    assert_eq!(definition.unwrap().as_str(), "a rounded fruit");
    let requests = seen.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1/dictionary");
    assert_eq!(requests[0].word.as_deref(), Some("apple"));
    assert_eq!(requests[0].api_key.as_deref(), Some(API_KEY));
}

#[tokio::test]
async fn test_definition_server_error_is_status_error() {
    let (base_url, _seen) = spawn_fake_provider().await;
    let provider = provider(&base_url, "/v1/randomword");

    let err = provider.definition(&key("broken")).await.unwrap_err();

    match err {
        UpstreamError::Status {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, "definition");
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_definition_unparseable_body_is_decode_error() {
    let (base_url, _seen) = spawn_fake_provider().await;
    let provider = provider(&base_url, "/v1/randomword");

    let garbled = provider.definition(&key("garbled")).await.unwrap_err();
    assert!(matches!(
        garbled,
        UpstreamError::Decode {
            endpoint: "definition",
            ..
        }
    ));

    let shapeless = provider.definition(&key("shapeless")).await.unwrap_err();
    assert!(matches!(shapeless, UpstreamError::Decode { .. }));
}

#[tokio::test]
async fn test_definition_marked_invalid_is_none() {
    let (base_url, _seen) = spawn_fake_provider().await;
    let provider = provider(&base_url, "/v1/randomword");

    let definition = provider.definition(&key("xyzzy")).await.unwrap();
    assert!(definition.is_none());
}

#[tokio::test]
async fn test_misconfigured_dictionary_url_is_status_error() {
    let (base_url, _seen) = spawn_fake_provider().await;
    let provider = HttpProvider::new(HttpProviderConfig {
        dictionary_url: format!("{}/v1/dictionry", base_url),
        random_url: format!("{}/v1/randomword", base_url),
        api_key: API_KEY.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = provider.definition(&key("apple")).await.unwrap_err();
    assert!(matches!(
        err,
        UpstreamError::Status {
            endpoint: "definition",
            status: 404,
            ..
        }
    ));
}

#[tokio::test]
async fn test_wrong_api_key_is_status_error() {
    let (base_url, _seen) = spawn_fake_provider().await;
    let provider = HttpProvider::new(HttpProviderConfig {
        dictionary_url: format!("{}/v1/dictionary", base_url),
        random_url: format!("{}/v1/randomword", base_url),
        api_key: "wrong".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = provider.definition(&key("apple")).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_random_words_shapes() {
    let (base_url, seen) = spawn_fake_provider().await;

    let list = provider(&base_url, "/v1/randomword").random_words().await.unwrap();
    assert_eq!(list, vec!["zephyr", "breeze"]);

    let single = provider(&base_url, "/v1/randomword/single")
        .random_words()
        .await
        .unwrap();
    assert_eq!(single, vec!["zephyr"]);

    let empty = provider(&base_url, "/v1/randomword/empty")
        .random_words()
        .await
        .unwrap();
    assert!(empty.is_empty());

    assert!(
        seen.requests()
            .iter()
            .all(|r| r.api_key.as_deref() == Some(API_KEY) && r.word.is_none())
    );
}

#[tokio::test]
async fn test_unreachable_provider_is_request_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = provider(&format!("http://{}", addr), "/v1/randomword");

    let err = provider.random_words().await.unwrap_err();
    assert!(matches!(
        err,
        UpstreamError::Request {
            endpoint: "random",
            ..
        }
    ));
}

// ============================================================================
// Service Routes
// ============================================================================

#[tokio::test]
async fn test_dictionary_route_serves_upstream_then_cache() {
    let (provider_url, seen) = spawn_fake_provider().await;
    let (service_url, _stop) = spawn_service(&provider_url).await;
    let client = reqwest::Client::new();

    let first = client
        .get(format!("{}/dictionary/Apple", service_url))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    let body: Value = first.json().await.unwrap();
    assert_eq!(
        body,
        json!({"word": "apple", "definition": "a rounded fruit", "source": "upstream"})
    );

    let second: Value = client
        .get(format!("{}/dictionary/apple", service_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["source"], "cache");

    assert_eq!(seen.requests().len(), 1);
}

#[tokio::test]
async fn test_dictionary_route_error_statuses() {
    let (provider_url, _seen) = spawn_fake_provider().await;
    let (service_url, _stop) = spawn_service(&provider_url).await;
    let client = reqwest::Client::new();

    let cases = [
        ("%20%20", 400, "invalid_input"),
        ("xyzzy", 404, "not_found"),
        ("broken", 502, "upstream_error"),
        ("garbled", 502, "upstream_error"),
    ];

    for (word, status, kind) in cases {
        let response = client
            .get(format!("{}/dictionary/{}", service_url, word))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), status, "word {:?}", word);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], kind, "word {:?}", word);
        assert!(body["message"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_upstream_failure_body_is_not_forwarded() {
    let (provider_url, _seen) = spawn_fake_provider().await;
    let (service_url, _stop) = spawn_service(&provider_url).await;

    let response = reqwest::get(format!("{}/dictionary/broken", service_url))
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    let body = response.text().await.unwrap();
    assert!(!body.contains("upstream exploded"), "body: {}", body);
    assert!(!body.contains("500"), "body: {}", body);
}

#[tokio::test]
async fn test_misconfigured_provider_is_bad_gateway_not_missing_word() {
    let (provider_url, _seen) = spawn_fake_provider().await;
    let upstream = HttpProvider::new(HttpProviderConfig {
        dictionary_url: format!("{}/v1/dictionry", provider_url),
        random_url: format!("{}/v1/randomword", provider_url),
        api_key: API_KEY.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let (service_url, _stop) = spawn_service_with(upstream).await;

    let response = reqwest::get(format!("{}/dictionary/apple", service_url))
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn test_random_route_reports_chosen_word() {
    let (provider_url, seen) = spawn_fake_provider().await;
    let (service_url, _stop) = spawn_service(&provider_url).await;

    let body: Value = reqwest::get(format!("{}/random", service_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({"word": "zephyr", "definition": "a gentle breeze", "source": "upstream"})
    );

    let looked_up: Vec<_> = seen.requests().into_iter().filter_map(|r| r.word).collect();
    assert_eq!(looked_up, vec!["zephyr"]);
}

#[tokio::test]
async fn test_health_route() {
    let (provider_url, _seen) = spawn_fake_provider().await;
    let (service_url, _stop) = spawn_service(&provider_url).await;

    let response = reqwest::get(format!("{}/health", service_url)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}
