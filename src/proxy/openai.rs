//! OpenAI provider
//!
//! Forwards each relay operation to the OpenAI REST API and normalizes
//! non-2xx responses into [`UpstreamError`].

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::{
    config::Config,
    error::{UpstreamError, UpstreamResult},
    proxy::{
        headers::{build_default_headers, with_assistants_beta},
        provider::{AiProvider, ChatCompletionParams},
    },
};

/// OpenAI REST client implementing [`AiProvider`]
pub struct OpenAIProvider {
    client: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(client: reqwest::Client, config: &Config) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.openai_api_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("OPENAI_API_URL cannot be used as a base URL");
        }

        let headers = build_default_headers(
            &config.openai_api_key,
            config.openai_organization.as_deref(),
            config.openai_project.as_deref(),
        )?;

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    /// Join path segments onto the base URL, encoding each one
    fn endpoint(&self, segments: &[&str]) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::transport("Provider URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.headers.clone())
    }

    fn assistants_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(with_assistants_beta(self.headers.clone()))
    }

    /// Send a request and decode the JSON payload
    async fn execute(&self, builder: RequestBuilder) -> UpstreamResult<Value> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        debug!(method = %method, url = %url, "Sending request to OpenAI");

        let response = self.client.execute(request).await.map_err(|e| {
            error!(method = %method, url = %url, error = %e, "Failed to send request to OpenAI");
            UpstreamError::from(e)
        })?;

        let status = response.status();
        debug!(method = %method, url = %url, status = %status, "Received response from OpenAI");

        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        method = %method,
                        url = %url,
                        status = %status,
                        error = %e,
                        "Failed to read OpenAI error body"
                    );
                    String::new()
                }
            };
            return Err(parse_error_body(status, &text));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl AiProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn create_chat_completion(&self, params: &ChatCompletionParams) -> UpstreamResult<Value> {
        let url = self.endpoint(&["chat", "completions"])?;
        self.execute(self.request(Method::POST, url).json(params))
            .await
    }

    async fn create_thread(&self) -> UpstreamResult<Value> {
        let url = self.endpoint(&["threads"])?;
        self.execute(self.assistants_request(Method::POST, url).json(&json!({})))
            .await
    }

    async fn create_message(&self, thread_id: &str, body: &Value) -> UpstreamResult<Value> {
        let url = self.endpoint(&["threads", thread_id, "messages"])?;
        self.execute(self.assistants_request(Method::POST, url).json(body))
            .await
    }

    async fn create_run(&self, thread_id: &str, body: &Value) -> UpstreamResult<Value> {
        let url = self.endpoint(&["threads", thread_id, "runs"])?;
        self.execute(self.assistants_request(Method::POST, url).json(body))
            .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> UpstreamResult<Value> {
        let url = self.endpoint(&["threads", thread_id, "runs", run_id])?;
        self.execute(self.assistants_request(Method::GET, url)).await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> UpstreamResult<Value> {
        let url = self.endpoint(&["threads", thread_id, "runs", run_id, "cancel"])?;
        self.execute(self.assistants_request(Method::POST, url)).await
    }

    async fn list_messages(&self, thread_id: &str, query: Option<&str>) -> UpstreamResult<Value> {
        let mut url = self.endpoint(&["threads", thread_id, "messages"])?;
        url.set_query(query.filter(|query| !query.is_empty()));
        self.execute(self.assistants_request(Method::GET, url)).await
    }
}

/// `{"error": {...}}` envelope returned by the provider on failure
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<Value>,
}

/// Turn a non-2xx provider response into an [`UpstreamError`]
fn parse_error_body(status: StatusCode, text: &str) -> UpstreamError {
    let fallback = || {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            trimmed.to_string()
        } else {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("status code {}", status.as_u16()))
        }
    };

    match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(ErrorEnvelope { error: body }) => UpstreamError {
            status: Some(status.as_u16()),
            message: body
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(fallback),
            error_type: body.error_type,
            code: body.code.and_then(|code| match code {
                Value::String(code) => Some(code),
                Value::Number(code) => Some(code.to_string()),
                _ => None,
            }),
        },
        Err(_) => UpstreamError::with_status(status.as_u16(), fallback()),
    }
}
