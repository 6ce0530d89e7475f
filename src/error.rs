//! Error types for the relay
//!
//! Every failed provider call becomes an [`UpstreamError`]. [`AppError`] is
//! what handlers return, and its `IntoResponse` impl is the single place
//! where failures turn into an HTTP status and JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A failed call to the AI provider
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status reported by the provider, if any response was received
    pub status: Option<u16>,
    pub message: String,
    pub error_type: Option<String>,
    pub code: Option<String>,
}

impl UpstreamError {
    /// Error reported by the provider with an HTTP status
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            error_type: None,
            code: None,
        }
    }

    /// Error raised before any provider response was received
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            error_type: None,
            code: None,
        }
    }

    /// Strip `type` and `code`, keeping only the message
    ///
    /// The thread, message and run routes only surface the message.
    pub fn brief(self) -> Self {
        Self {
            error_type: None,
            code: None,
            ..self
        }
    }

    /// Status code to answer with, falling back to 500
    pub fn status_code(&self) -> StatusCode {
        self.status
            .and_then(|status| StatusCode::from_u16(status).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::with_status(status.as_u16(), err.to_string());
        }

        if err.is_timeout() {
            Self::transport("Request timed out.")
        } else if err.is_connect() {
            Self::transport("Connection error.")
        } else {
            Self::transport(err.to_string())
        }
    }
}

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    #[error("Invalid JSON in request body: {0}")]
    BadRequest(String),

    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<UpstreamError> for ErrorBody {
    fn from(err: UpstreamError) -> Self {
        Self {
            message: err.message,
            error_type: err.error_type,
            code: err.code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Upstream(err) => (err.status_code(), ErrorBody::from(err)),
            AppError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: self.to_string(),
                    error_type: Some("invalid_request_error".to_string()),
                    code: None,
                },
            ),
            AppError::OriginNotAllowed(_) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    message: self.to_string(),
                    error_type: Some("cors_error".to_string()),
                    code: None,
                },
            ),
        };

        (status, Json(ErrorResponse { error: body })).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Result of a single provider call
pub type UpstreamResult<T> = Result<T, UpstreamError>;
