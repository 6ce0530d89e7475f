//! OpenAI relay - stateless HTTP relay for a browser frontend
//!
//! Forwards chat completion and assistant thread requests to the OpenAI
//! API so the API key never reaches the browser, and answers CORS for a
//! fixed set of frontend origins.

pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::error::{AppError, UpstreamError};
pub use crate::proxy::{AiProvider, OpenAIProvider};

/// Application state shared across all request handlers
///
/// Built once at startup and never mutated afterwards.
pub struct AppState {
    pub config: Config,
    /// AI provider every relay route forwards to
    pub ai_provider: Arc<dyn AiProvider>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(Duration::from_secs(config.openai_timeout_seconds))
            .build()?;

        let ai_provider: Arc<dyn AiProvider> =
            Arc::new(OpenAIProvider::new(http_client, &config)?);

        Ok(Self::with_provider(config, ai_provider))
    }

    /// Create an application state around an existing provider
    pub fn with_provider(config: Config, ai_provider: Arc<dyn AiProvider>) -> Self {
        Self {
            config,
            ai_provider,
        }
    }
}
