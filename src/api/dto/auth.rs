//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::UserResponse;
use crate::services::LoginOutcome;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com", format = "email")]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    #[schema(example = "password123", format = "password")]
    pub password: String,
}

/// Register request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"))]
    #[schema(example = "john_doe", min_length = 3, max_length = 32)]
    pub username: String,
    /// Must not belong to another user
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com", format = "email")]
    pub email: String,
    /// Plain text, stored hashed
    #[validate(length(min = 5, max = 72, message = "Password must be between 5 and 72 characters"))]
    #[schema(example = "password123", format = "password", min_length = 5, max_length = 72)]
    pub password: String,
}

/// Login response with the access token and the user it was issued for
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token,
            token_type: "Bearer".to_string(),
            expires_in: outcome.expires_in,
            user: outcome.user.into(),
        }
    }
}
