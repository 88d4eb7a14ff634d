//! JWT authentication middleware.
//!
//! `auth_middleware` turns a bearer token into an `AuthUser` request
//! extension; `admin_middleware` additionally requires the admin role.

use axum::{
    Extension,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_token};

/// Extension type for authenticated user information
///
/// This is added to request extensions after successful authentication
/// and can be extracted in handlers using `Extension<AuthUser>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub username: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> AppResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: claims.email,
            username: claims.username,
        })
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
fn bearer_token(request: &Request) -> AppResult<&str> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format. Expected: Bearer <token>")
        })
}

/// JWT authentication middleware
///
/// # Errors
/// Returns 401 Unauthorized if the header is missing or malformed, or the
/// token is invalid or expired.
///
/// # Example
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = validate_token(bearer_token(&request)?, &state.jwt_config.secret)?;
    let auth_user = AuthUser::try_from(claims)?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Admin gate; must be layered inside `auth_middleware`.
///
/// The role is looked up on every request, so revoking the admin role takes
/// effect without waiting for tokens to expire.
pub async fn admin_middleware(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    if !state.services.users.is_admin(auth_user.user_id).await? {
        tracing::debug!(user_id = auth_user.user_id, "Rejected non-admin request");
        return Err(AppError::forbidden("Administrator role required"));
    }

    Ok(next.run(request).await)
}
