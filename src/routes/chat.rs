//! Chat completions endpoint
//!
//! Relays `POST /api/openai/chat/completions` to the provider. Only the
//! model, messages, temperature, token limit and response format are
//! forwarded; every other field in the inbound body is ignored.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::Instrument;

use crate::{
    error::AppResult,
    proxy::{ChatCompletionParams, RequestContext},
    routes::parse_json_body,
    AppState,
};

/// Model used when the request does not name one
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature used when the request does not set one
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Chat completion request as sent by the frontend
///
/// Fields stay raw JSON; a wrongly-typed value is the provider's to reject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: Option<Value>,
    pub messages: Option<Value>,
    pub temperature: Option<Value>,
    pub max_tokens: Option<Value>,
    pub response_format: Option<Value>,
}

impl ChatCompletionRequest {
    /// Pick the forwarded fields out of an inbound body
    ///
    /// A body that is not a JSON object carries none of them.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(_) => serde_json::from_value(body).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Apply defaults and build the parameters sent upstream
    pub fn into_params(self) -> ChatCompletionParams {
        // An empty model name falls back, but an explicit temperature of 0 is kept
        ChatCompletionParams {
            model: match self.model {
                None => Value::from(DEFAULT_MODEL),
                Some(Value::String(model)) if model.is_empty() => Value::from(DEFAULT_MODEL),
                Some(model) => model,
            },
            messages: self.messages,
            temperature: self
                .temperature
                .unwrap_or_else(|| Value::from(DEFAULT_TEMPERATURE)),
            max_tokens: self.max_tokens,
            response_format: self.response_format,
        }
    }
}

/// Handle chat completion requests
///
/// The provider's completion object is returned verbatim.
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let request = ChatCompletionRequest::from_body(parse_json_body(&body)?);
    let params = request.into_params();

    let model = match &params.model {
        Value::String(model) => model.clone(),
        other => other.to_string(),
    };
    let ctx = RequestContext::new("chat.completions")
        .with_model(model)
        .with_message_count(
            params
                .messages
                .as_ref()
                .and_then(Value::as_array)
                .map(Vec::len),
        );
    ctx.log_request_start();

    let completion = ctx.record(
        state
            .ai_provider
            .create_chat_completion(&params)
            .instrument(ctx.create_span())
            .await,
    )?;

    Ok(Json(completion))
}
