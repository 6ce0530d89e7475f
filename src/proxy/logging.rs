//! Request logging utilities for relayed calls
//!
//! Provides structured logging with correlation IDs so a relayed request
//! can be followed from receipt through the provider call to its outcome.

use std::time::Instant;
use tracing::{error, info, Span};
use uuid::Uuid;

use crate::error::{UpstreamError, UpstreamResult};

/// Context for tracking a request through the relay
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Provider operation being relayed, e.g. `runs.retrieve`
    pub operation: String,
    /// Model being used (chat completions only)
    pub model: Option<String>,
    /// Number of messages in a chat completion request
    pub message_count: Option<usize>,
    pub thread_id: Option<String>,
    pub run_id: Option<String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(operation: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            operation: operation.to_string(),
            model: None,
            message_count: None,
            thread_id: None,
            run_id: None,
        }
    }

    /// Set the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_message_count(mut self, count: Option<usize>) -> Self {
        self.message_count = count;
        self
    }

    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_run(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request receipt
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            operation = %self.operation,
            model = ?self.model,
            messages = ?self.message_count,
            thread_id = ?self.thread_id,
            run_id = ?self.run_id,
            "Request received"
        );
    }

    /// Log successful request completion
    pub fn log_request_complete(&self) {
        info!(
            trace_id = %self.trace_id,
            operation = %self.operation,
            elapsed_ms = %self.elapsed_ms(),
            "Provider response relayed"
        );
    }

    /// Log request failure
    pub fn log_error(&self, err: &UpstreamError) {
        error!(
            trace_id = %self.trace_id,
            operation = %self.operation,
            model = ?self.model,
            thread_id = ?self.thread_id,
            run_id = ?self.run_id,
            status = ?err.status,
            error = %err.message,
            elapsed_ms = %self.elapsed_ms(),
            "Provider call failed"
        );
    }

    /// Log the outcome of a provider call and hand it back unchanged
    pub fn record<T>(&self, result: UpstreamResult<T>) -> UpstreamResult<T> {
        match &result {
            Ok(_) => self.log_request_complete(),
            Err(err) => self.log_error(err),
        }
        result
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "relay_request",
            trace_id = %self.trace_id,
            operation = %self.operation,
        )
    }
}
