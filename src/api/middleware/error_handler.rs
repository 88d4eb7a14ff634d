//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself as an `ErrorResponse` body. The
//! `global_error_handler` middleware then stamps the request ID onto every
//! error body and rewrites axum's own plain-text rejections (unknown route,
//! method not allowed, timeouts) into the same JSON shape.

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode, header, response::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::api::middleware::RequestId;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 409 CONFLICT
    /// - Validation / ValidationErrors / BadRequest → 400 BAD_REQUEST
    /// - Unauthorized → 401 UNAUTHORIZED
    /// - Forbidden → 403 FORBIDDEN
    /// - Database / Configuration / Internal → 500 INTERNAL_SERVER_ERROR
    /// - ConnectionPool → 503 SERVICE_UNAVAILABLE
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let error_response = match &self {
            AppError::NotFound { entity, field, value } => ErrorResponse::new(
                "NOT_FOUND",
                format!("{} with {}={} was not found", entity, field, value),
            )
            .with_details(json!({ "entity": entity, "field": field })),
            AppError::Duplicate { entity, field, .. } => ErrorResponse::new(
                "DUPLICATE",
                format!("{} with this {} already exists", entity, field),
            )
            .with_details(json!({ "entity": entity, "field": field })),
            AppError::Validation { field, reason } => {
                ErrorResponse::new("VALIDATION_ERROR", format!("Invalid {}: {}", field, reason))
                    .with_details(json!([{ "field": field, "message": reason }]))
            }
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(json!(errors))
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message.as_str()),
            AppError::Unauthorized { message } => {
                ErrorResponse::new("UNAUTHORIZED", message.as_str())
            }
            AppError::Forbidden { message } => ErrorResponse::new("FORBIDDEN", message.as_str()),
            AppError::Database { operation, .. } => {
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred")
                    .with_details(json!({ "operation": operation }))
            }
            AppError::Configuration { .. } => {
                ErrorResponse::new("CONFIGURATION_ERROR", "The service is misconfigured")
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %error_chain(&self), "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let mut response = (status, Json(error_response.clone())).into_response();
        response.extensions_mut().insert(error_response);
        response
    }
}

/// Full `source()` chain, so internal details reach the logs but never the client.
fn error_chain(error: &AppError) -> String {
    let mut out = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    out
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Global error handling middleware.
///
/// Must run inside `request_id_middleware` so the request ID is available.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|id| id.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    if let Some(error_response) = response.extensions().get::<ErrorResponse>().cloned() {
        let (parts, _) = response.into_parts();
        return rebuild(parts, with_request_id(error_response, request_id.as_deref()));
    }

    if is_json(response.headers()) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let original_message = axum::body::to_bytes(body, 64 * 1024)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();

    let error_response = fallback_error(status, original_message);
    rebuild(parts, with_request_id(error_response, request_id.as_deref()))
}

fn with_request_id(error_response: ErrorResponse, request_id: Option<&str>) -> ErrorResponse {
    match request_id {
        Some(id) => error_response.with_request_id(id),
        None => error_response,
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Replaces the body, keeping status and the headers other layers already set.
fn rebuild(mut parts: Parts, error_response: ErrorResponse) -> Response {
    let body = match serde_json::to_vec(&error_response) {
        Ok(body) => body,
        Err(_) => return parts.status.into_response(),
    };
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    parts.extensions.insert(error_response);
    Response::from_parts(parts, Body::from(body))
}

fn fallback_error(status: StatusCode, original_message: String) -> ErrorResponse {
    let (code, default_message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::UNAUTHORIZED => ("UNAUTHORIZED", "Authentication required"),
        StatusCode::FORBIDDEN => ("FORBIDDEN", "Access denied"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::SERVICE_UNAVAILABLE => ("SERVICE_UNAVAILABLE", "Service temporarily unavailable"),
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };

    // Server-side bodies may carry internals; only client errors echo the text.
    let message = if original_message.is_empty() || status.is_server_error() {
        default_message.to_string()
    } else {
        original_message
    };
    ErrorResponse::new(code, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_to_status_code(&AppError::not_found("user", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_to_status_code(&AppError::duplicate("user", "email", "a@b.c")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_to_status_code(&AppError::ValidationErrors { errors: vec![] }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&AppError::unauthorized("no")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_to_status_code(&AppError::forbidden("no")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_to_status_code(&AppError::ConnectionPool {
                source: anyhow::anyhow!("down")
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error_to_status_code(&AppError::Internal {
                source: anyhow::anyhow!("boom")
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let response = AppError::Database {
            operation: "create user".to_string(),
            source: anyhow::anyhow!("disk I/O error at /var/lib/secret.db"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert!(!body.to_string().contains("secret.db"));
    }

    #[tokio::test]
    async fn test_duplicate_does_not_echo_value() {
        let response = AppError::duplicate("user", "email", "taken@example.com").into_response();
        let body = body_json(response).await;
        assert_eq!(body["code"], "DUPLICATE");
        assert!(!body.to_string().contains("taken@example.com"));
    }

    fn app() -> Router {
        Router::new()
            .route("/fail", get(|| async { AppError::forbidden("Admins only") }))
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(
                |mut request: Request, next: Next| async move {
                    request
                        .extensions_mut()
                        .insert(RequestId("req-123".to_string()));
                    next.run(request).await
                },
            ))
    }

    #[tokio::test]
    async fn test_request_id_is_stamped_on_app_errors() {
        let response = app()
            .oneshot(Request::get("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["message"], "Admins only");
        assert_eq!(body["request_id"], "req-123");
    }

    #[tokio::test]
    async fn test_plain_rejections_become_json() {
        let response = app()
            .oneshot(Request::post("/fail").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

        let response = app()
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-123");
    }
}
