use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub username: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// # Errors
    /// `AppError::Internal` when `expiration_hours` does not fit a timestamp.
    pub fn new(
        user_id: i32,
        email: String,
        username: String,
        expiration_hours: i64,
    ) -> AppResult<Self> {
        let lifetime = SignedDuration::try_from_hours(expiration_hours).ok_or_else(|| {
            AppError::Internal {
                source: anyhow::anyhow!("invalid token lifetime of {} hours", expiration_hours),
            }
        })?;
        let now = Timestamp::now();
        let exp = now.checked_add(lifetime).map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("token expiry out of range: {}", e),
        })?;

        Ok(Self {
            sub: user_id.to_string(),
            email,
            username,
            iat: now.as_second(),
            exp: exp.as_second(),
        })
    }

    /// The user ID carried in `sub`.
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))
    }
}

/// Generates a signed HS256 token for a user
///
/// # Example
/// ```ignore
/// let token = generate_token(1, "user@example.com".into(), "user".into(), "secret", 24)?;
/// ```
pub fn generate_token(
    user_id: i32,
    email: String,
    username: String,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user_id, email, username, expiration_hours)?;

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Validates and decodes a JWT token
///
/// Every failure maps to `AppError::Unauthorized` with a message naming the cause.
pub fn validate_token(token: &str, secret: &str) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
        ErrorKind::InvalidToken => AppError::unauthorized("Invalid token"),
        ErrorKind::InvalidSignature => AppError::unauthorized("Invalid token signature"),
        _ => AppError::unauthorized(format!("Token validation failed: {}", e)),
    })
}
