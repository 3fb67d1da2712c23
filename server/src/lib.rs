//! Web front end for the remote speech service: a text-to-speech panel and
//! a speech-to-speech (translate and clone) panel, with per-session state.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod panel;
pub mod render;
pub mod session;
pub mod validation;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use voice_client::SpeechService;

use crate::config::ServerConfig;
use crate::metrics::AppMetrics;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub speech: Arc<dyn SpeechService>,
    pub sessions: SessionStore,
    pub metrics: AppMetrics,
    pub request_count: Arc<AtomicU64>,
    pub started_at: Instant,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(speech: Arc<dyn SpeechService>, config: ServerConfig) -> Self {
        Self {
            speech,
            sessions: SessionStore::new(config.session_ttl()),
            metrics: AppMetrics::new(),
            request_count: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
            config,
        }
    }
}

// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = value.clone() {
        request.headers_mut().insert("x-request-id", value);
    }
    let mut response = next.run(request).await;
    if let Some(value) = value {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Routes, request-id middleware and upload limit. Rate limiting, CORS,
/// tracing and timeouts are layered on by the binary.
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/tts", post(handlers::tts_submit))
        .route("/s2s", post(handlers::s2s_submit))
        .route("/s2s/audio", post(handlers::s2s_upload))
        .route("/s2s/record", post(handlers::s2s_record))
        .route("/languages", get(handlers::list_languages))
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(axum::middleware::from_fn(add_request_id))
        .with_state(state)
}
