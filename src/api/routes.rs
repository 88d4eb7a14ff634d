//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderName, Method, StatusCode, header},
    middleware,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    REQUEST_ID_HEADER, admin_middleware, auth_middleware, global_error_handler,
    logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS
/// 2. Request ID - generates/propagates request IDs
/// 3. Logging - logs requests with request IDs
/// 4. Global error handler - JSON error bodies carrying the request ID
/// 5. Timeout - 408 once `request_timeout` elapses
///
/// Protected groups add `auth_middleware` (and `admin_middleware`) as route
/// layers, so unknown methods on those paths still answer 405.
///
/// # Example
/// ```ignore
/// let state = AppState::new(pool, &settings.jwt, Arc::new(Argon2Hasher::new()));
/// let router = create_router(state, settings.server.request_timeout());
/// ```
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let (router, openapi) = api_router(&state).split_for_parts();

    router
        .route("/openapi.json", get(move || async move { Json(openapi) }))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer())
        .with_state(state)
}

/// All documented routes, grouped by the authentication they require.
pub fn api_router(state: &AppState) -> OpenApiRouter<AppState> {
    let authenticated = handlers::profile::profile_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    let admin = handlers::users::user_routes()
        .merge(handlers::roles::role_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .merge(handlers::auth::auth_routes())
        .merge(authenticated)
        .merge(admin)
}

fn cors_layer() -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, request_id.clone()])
        .expose_headers([request_id])
        .max_age(Duration::from_secs(3600))
}
