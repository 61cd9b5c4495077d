// src/logging_middleware.rs
//! Middleware for logging requests with credentials redacted

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, Span};

/// Query parameters whose values never reach the logs
const REDACTED_PARAMS: [&str; 2] = ["code", "token"];

/// Span for `TraceLayer`. Records the path only so query credentials stay out
/// of every event logged inside the request.
pub fn request_span(request: &Request) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version(),
    )
}

/// Logs method, path, status and latency of every request
pub async fn log_request_response(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(redact_query);
    let started = Instant::now();

    debug!(method = %method, path = %path, query = ?query, "📥 Request");

    let response = next.run(request).await;

    debug!(
        method = %method,
        path = %path,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "📤 Response"
    );

    response
}

/// Replaces the values of credential-bearing query parameters with `***`.
pub fn redact_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if REDACTED_PARAMS.contains(&key) => format!("{}=***", key),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}
