//! HTTP routes for the relay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod chat;
pub mod health;
pub mod threads;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    middleware::origin::origin_guard,
    AppState,
};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let relay_routes = Router::new()
        .route("/api/openai/chat/completions", post(chat::chat_completions))
        .route("/api/openai/threads", post(threads::create_thread))
        .route(
            "/api/openai/threads/:thread_id/messages",
            post(threads::create_message).get(threads::list_messages),
        )
        .route(
            "/api/openai/threads/:thread_id/runs",
            post(threads::create_run),
        )
        .route(
            "/api/openai/threads/:thread_id/runs/:run_id",
            get(threads::retrieve_run),
        )
        .route(
            "/api/openai/threads/:thread_id/runs/:run_id/cancel",
            post(threads::cancel_run),
        );

    let public_routes = Router::new().route("/health", get(health::health_check));

    // ServiceBuilder layers run top to bottom: trace, then CORS (which
    // answers preflights itself), then the origin guard
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard));

    Router::new()
        .merge(public_routes)
        .merge(relay_routes)
        .layer(middleware_stack)
        .with_state(state)
}

/// CORS policy: the configured origins, with credentials allowed
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // Wildcards cannot be combined with credentials
            Ok(value) if origin != "*" => Some(value),
            _ => {
                warn!(origin = %origin, "Ignoring unusable allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Parse an inbound JSON body, treating an empty body as `{}`
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    let result = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"{}")
    } else {
        serde_json::from_slice(body)
    };

    result.map_err(|e| AppError::BadRequest(e.to_string()))
}
