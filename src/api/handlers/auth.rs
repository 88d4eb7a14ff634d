//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the public authentication routes
///
/// # Routes
/// - `POST /register` - Create an account
/// - `POST /login` - Exchange credentials for a bearer token
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(login))
}

/// POST /register - Register new user
///
/// The account starts without a role.
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .services
        .users
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /login - Authenticate user
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .services
        .users
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(outcome.into()))
}
