//! Handlers for the authenticated caller's own account.

use axum::{Extension, Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PROFILE_TAG;
use crate::api::dto::{
    ChangePasswordRequest, ErrorResponse, MessageResponse, UpdateProfileRequest, UserResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the profile routes. Callers must layer `auth_middleware` on top.
///
/// # Routes
/// - `GET /user/profile`
/// - `PUT /user/profile`
/// - `POST /user/change-password`
pub fn profile_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_profile, update_profile))
        .routes(routes!(change_password))
}

#[utoipa::path(
    get,
    path = "/user/profile",
    tag = PROFILE_TAG,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_user(auth_user.user_id).await?;
    Ok(Json(user.into()))
}

/// Absent fields are left unchanged.
#[utoipa::path(
    put,
    path = "/user/profile",
    tag = PROFILE_TAG,
    security(("bearerAuth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "Email belongs to another user", body = ErrorResponse)
    )
)]
async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users
        .update_profile(auth_user.user_id, payload.username, payload.email)
        .await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/user/change-password",
    tag = PROFILE_TAG,
    security(("bearerAuth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Missing token or wrong old password", body = ErrorResponse)
    )
)]
async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users
        .change_password(auth_user.user_id, &payload.old_password, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed")))
}
