//! Assistant thread, message and run endpoints
//!
//! Each handler makes one provider call and returns the result verbatim.
//! Failures only surface the provider's error message.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    Json,
};
use serde_json::Value;
use tracing::Instrument;

use crate::{
    error::{AppResult, UpstreamError},
    proxy::RequestContext,
    routes::parse_json_body,
    AppState,
};

/// POST /api/openai/threads
pub async fn create_thread(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let ctx = RequestContext::new("threads.create");
    ctx.log_request_start();

    let thread = ctx
        .record(
            state
                .ai_provider
                .create_thread()
                .instrument(ctx.create_span())
                .await,
        )
        .map_err(UpstreamError::brief)?;

    Ok(Json(thread))
}

/// POST /api/openai/threads/:thread_id/messages
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let payload: Value = parse_json_body(&body)?;

    let ctx = RequestContext::new("messages.create").with_thread(thread_id.as_str());
    ctx.log_request_start();

    let message = ctx
        .record(
            state
                .ai_provider
                .create_message(&thread_id, &payload)
                .instrument(ctx.create_span())
                .await,
        )
        .map_err(UpstreamError::brief)?;

    Ok(Json(message))
}

/// GET /api/openai/threads/:thread_id/messages
///
/// The query string (`limit`, `order`, `after`, ...) is forwarded untouched
/// and left for the provider to validate.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<Value>> {
    let ctx = RequestContext::new("messages.list").with_thread(thread_id.as_str());
    ctx.log_request_start();

    let messages = ctx
        .record(
            state
                .ai_provider
                .list_messages(&thread_id, query.as_deref())
                .instrument(ctx.create_span())
                .await,
        )
        .map_err(UpstreamError::brief)?;

    Ok(Json(messages))
}

/// POST /api/openai/threads/:thread_id/runs
pub async fn create_run(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let payload: Value = parse_json_body(&body)?;

    let ctx = RequestContext::new("runs.create").with_thread(thread_id.as_str());
    ctx.log_request_start();

    let run = ctx
        .record(
            state
                .ai_provider
                .create_run(&thread_id, &payload)
                .instrument(ctx.create_span())
                .await,
        )
        .map_err(UpstreamError::brief)?;

    Ok(Json(run))
}

/// GET /api/openai/threads/:thread_id/runs/:run_id
pub async fn retrieve_run(
    State(state): State<Arc<AppState>>,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let ctx = RequestContext::new("runs.retrieve")
        .with_thread(thread_id.as_str())
        .with_run(run_id.as_str());
    ctx.log_request_start();

    let run = ctx
        .record(
            state
                .ai_provider
                .retrieve_run(&thread_id, &run_id)
                .instrument(ctx.create_span())
                .await,
        )
        .map_err(UpstreamError::brief)?;

    Ok(Json(run))
}

/// POST /api/openai/threads/:thread_id/runs/:run_id/cancel
pub async fn cancel_run(
    State(state): State<Arc<AppState>>,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let ctx = RequestContext::new("runs.cancel")
        .with_thread(thread_id.as_str())
        .with_run(run_id.as_str());
    ctx.log_request_start();

    let run = ctx
        .record(
            state
                .ai_provider
                .cancel_run(&thread_id, &run_id)
                .instrument(ctx.create_span())
                .await,
        )
        .map_err(UpstreamError::brief)?;

    Ok(Json(run))
}
