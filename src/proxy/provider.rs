//! AI Provider abstraction layer
//!
//! Defines the trait interface the route handlers call. Payloads are kept
//! as opaque JSON so the relay never depends on the provider's schema.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::UpstreamResult;

/// Parameters forwarded to the chat completions endpoint
///
/// Defaults have already been applied. Values are kept as raw JSON so the
/// provider, not the relay, judges their types. Absent optional fields
/// are left out of the outbound body entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionParams {
    pub model: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Value>,
    pub temperature: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

/// Trait defining the provider operations the relay exposes
///
/// Every method performs exactly one provider call and returns the
/// provider's JSON payload untouched.
///
/// # Security
///
/// Implementations MUST authenticate with their own configured key and
/// never forward client headers upstream.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Get the provider name for logging
    fn name(&self) -> &'static str;

    /// Create a chat completion
    async fn create_chat_completion(&self, params: &ChatCompletionParams) -> UpstreamResult<Value>;

    /// Create an empty conversation thread
    async fn create_thread(&self) -> UpstreamResult<Value>;

    /// Append a message to a thread
    async fn create_message(&self, thread_id: &str, body: &Value) -> UpstreamResult<Value>;

    /// Start a run on a thread
    async fn create_run(&self, thread_id: &str, body: &Value) -> UpstreamResult<Value>;

    /// Retrieve a run
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> UpstreamResult<Value>;

    /// Cancel an in-progress run
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> UpstreamResult<Value>;

    /// List the messages of a thread
    ///
    /// `query` is the inbound query string, forwarded as is.
    async fn list_messages(&self, thread_id: &str, query: Option<&str>) -> UpstreamResult<Value>;
}
