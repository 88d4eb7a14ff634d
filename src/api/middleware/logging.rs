//! Request logging middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{Instrument, Level, info, span, warn};

use super::RequestId;

/// Logs each request and its outcome inside an `http_request` span.
///
/// Must run inside `request_id_middleware` to pick up the request ID.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let span = span!(
        Level::INFO,
        "http_request",
        method = %method,
        path = %path,
        request_id = %request_id
    );

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        let status = response.status().as_u16();
        let duration_ms = start.elapsed().as_millis() as u64;

        if response.status().is_server_error() {
            warn!(status, duration_ms, "Response sent");
        } else {
            info!(status, duration_ms, "Response sent");
        }

        response
    }
    .instrument(span)
    .await
}
