//! Header utilities for provider requests
//!
//! Outbound requests carry only headers built here. Client headers
//! (including any `Authorization` the browser sent) are never forwarded.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::UpstreamError;

/// Beta header required by the assistants (threads/runs) endpoints
pub const ASSISTANTS_BETA: &str = "assistants=v2";

const OPENAI_BETA: HeaderName = HeaderName::from_static("openai-beta");
const OPENAI_ORGANIZATION: HeaderName = HeaderName::from_static("openai-organization");
const OPENAI_PROJECT: HeaderName = HeaderName::from_static("openai-project");

/// Build the headers sent with every provider request
pub fn build_default_headers(
    api_key: &str,
    organization: Option<&str>,
    project: Option<&str>,
) -> Result<HeaderMap, UpstreamError> {
    let mut headers = HeaderMap::new();

    headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", api_key))?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(organization) = organization {
        headers.insert(OPENAI_ORGANIZATION, header_value(organization)?);
    }
    if let Some(project) = project {
        headers.insert(OPENAI_PROJECT, header_value(project)?);
    }

    Ok(headers)
}

/// Add the assistants beta header
pub fn with_assistants_beta(mut headers: HeaderMap) -> HeaderMap {
    headers.insert(OPENAI_BETA, HeaderValue::from_static(ASSISTANTS_BETA));
    headers
}

fn header_value(value: &str) -> Result<HeaderValue, UpstreamError> {
    HeaderValue::from_str(value)
        .map_err(|_| UpstreamError::transport("Invalid characters in provider credentials"))
}
