//! User-related DTOs for API requests and responses.

use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for `PUT /user/profile`; absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"))]
    #[schema(min_length = 3, max_length = 32)]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password cannot be empty"))]
    #[schema(format = "password")]
    pub old_password: String,
    #[validate(length(min = 5, max = 72, message = "Password must be between 5 and 72 characters"))]
    #[schema(format = "password", min_length = 5, max_length = 72)]
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 5, max = 72, message = "Password must be between 5 and 72 characters"))]
    #[schema(format = "password", min_length = 5, max_length = 72)]
    pub new_password: String,
}

/// Request body for `POST /users/{id}/assign-role`.
///
/// `role_id` is accepted both as a JSON number and as a numeric string.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AssignRoleRequest {
    #[serde(deserialize_with = "number_or_string")]
    #[validate(range(min = 1, message = "role_id must be positive"))]
    #[schema(value_type = i32, example = 1)]
    pub role_id: i32,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i32),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("role_id must be an integer, got '{}'", s))),
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for user data (never includes the password hash).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "john_doe")]
    pub username: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    /// `null` until a role is assigned
    #[schema(example = 1)]
    pub role_id: Option<i32>,
    /// RFC 3339 timestamp of the last successful login
    #[schema(example = "2025-01-01T12:00:00Z")]
    pub last_seen: String,
    #[schema(example = "2025-01-01T12:00:00Z")]
    pub created_at: String,
    #[schema(example = "2025-01-01T12:00:00Z")]
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role_id: user.role_id,
            last_seen: user.last_seen.to_jiff().to_string(),
            created_at: user.created_at.to_jiff().to_string(),
            updated_at: user.updated_at.to_jiff().to_string(),
        }
    }
}
