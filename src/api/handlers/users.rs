//! Administrative user management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ADMIN_TAG;
use crate::api::dto::{
    AssignRoleRequest, ErrorResponse, MessageResponse, ResetPasswordRequest, UserResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the admin user routes. Callers must layer `auth_middleware` and
/// `admin_middleware` on top.
///
/// # Routes
/// - `GET /users` - List all users
/// - `DELETE /users/{id}` - Delete a user
/// - `POST /users/{id}/assign-role` - Link a user to a role
/// - `POST /users/{id}/reset-password` - Set a new password
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(delete_user))
        .routes(routes!(assign_role))
        .routes(routes!(reset_password))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = ADMIN_TAG,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All users ordered by ID", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    )
)]
async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = ADMIN_TAG,
    security(("bearerAuth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn delete_user(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/users/{id}/assign-role",
    tag = ADMIN_TAG,
    security(("bearerAuth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "User or role not found", body = ErrorResponse)
    )
)]
async fn assign_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AssignRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.assign_role(id, payload.role_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/users/{id}/reset-password",
    tag = ADMIN_TAG,
    security(("bearerAuth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users
        .reset_password(id, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password reset")))
}
