use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ADMIN_TAG;
use crate::api::dto::{ErrorResponse, RoleResponse};
use crate::error::AppResult;
use crate::state::AppState;

/// `GET /roles`, admin only.
pub fn role_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_roles))
}

#[utoipa::path(
    get,
    path = "/roles",
    tag = ADMIN_TAG,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All roles ordered by ID", body = [RoleResponse]),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    )
)]
async fn list_roles(State(state): State<AppState>) -> AppResult<Json<Vec<RoleResponse>>> {
    let roles = state.services.users.list_roles().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}
