//! HTTP surface over the lookup operations.
//!
//! - `GET /dictionary/:word` -> definition of `word`
//! - `GET /random` -> a random word and its definition
//! - `GET /health` -> `ok`
//!
//! Lookup errors map to stable statuses: invalid input 400, not found 404,
//! cache failure 500, upstream failure 502. Cache and upstream failure details
//! are logged, never returned to the caller.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::entry::{Definition, RandomResolution, Resolution, Source};
use crate::error::LookupError;
use crate::random::RandomWordOrchestrator;
use crate::resolver::DefinitionResolver;

/// Shared handler state. Cloned per request; collaborators are behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    resolver: DefinitionResolver,
    random: RandomWordOrchestrator,
}

impl AppState {
    pub fn new(resolver: DefinitionResolver) -> Self {
        let random = RandomWordOrchestrator::new(resolver.clone());
        AppState { resolver, random }
    }
}

#[derive(Debug, Serialize)]
struct LookupResponse {
    word: String,
    definition: Definition,
    source: Source,
}

impl From<Resolution> for LookupResponse {
    fn from(resolution: Resolution) -> Self {
        LookupResponse {
            word: resolution.key.into_inner(),
            definition: resolution.definition,
            source: resolution.source,
        }
    }
}

impl From<RandomResolution> for LookupResponse {
    fn from(random: RandomResolution) -> Self {
        LookupResponse::from(random.resolution)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

fn status_code(err: &LookupError) -> StatusCode {
    match err {
        LookupError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LookupError::NotFound { .. } => StatusCode::NOT_FOUND,
        LookupError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LookupError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Message shown to the caller.
fn public_message(err: &LookupError) -> String {
    match err {
        LookupError::InvalidInput(_) | LookupError::NotFound { .. } => err.to_string(),
        LookupError::Cache(_) => "cache store unavailable".to_string(),
        LookupError::Upstream(_) => "dictionary provider unavailable".to_string(),
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "lookup failed");
        }
        let body = ErrorResponse {
            error: self.kind(),
            message: public_message(&self),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dictionary/:word", get(define))
        .route("/random", get(random))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn define(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<LookupResponse>, LookupError> {
    let resolution = state.resolver.resolve(&word).await?;
    Ok(Json(resolution.into()))
}

async fn random(State(state): State<AppState>) -> Result<Json<LookupResponse>, LookupError> {
    let random = state.random.resolve_random().await?;
    Ok(Json(random.into()))
}

async fn health() -> &'static str {
    "ok"
}
