//! Origin allow-list middleware
//!
//! The CORS layer only decides which response headers a browser sees. This
//! guard makes the allow-list binding: a request carrying an `Origin` that
//! is not allowed never reaches a handler, so no provider call is made.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{instrument, warn};

use crate::{error::AppError, AppState};

/// Extract the `Origin` header, if it is present and valid UTF-8
pub fn request_origin(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
}

/// Origin guard middleware
///
/// Requests without an `Origin` header (server-to-server, curl) pass through.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn origin_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.headers().contains_key(header::ORIGIN) {
        let origin = request_origin(&request).unwrap_or_default();

        if !state.config.is_origin_allowed(origin) {
            warn!(origin = %origin, "Rejected request from disallowed origin");
            return Err(AppError::OriginNotAllowed(origin.to_string()));
        }
    }

    Ok(next.run(request).await)
}
