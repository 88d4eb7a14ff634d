//! User service for business logic operations.
//!
//! Provides a higher-level API for user operations, encapsulating
//! business rules and coordinating with the repository layer.

use std::sync::Arc;

use jiff_diesel::ToDiesel;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, Role, UpdateUser, User};
use crate::repositories::{RoleRepository, UserRepository, UserStore};
use crate::utils::jwt;
use crate::utils::password::PasswordHasher;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// A freshly issued access token together with the user it was issued for.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// User service for handling user-related business logic.
///
/// Since repositories use `Arc` internally via the connection pool and the
/// hasher is shared behind an `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    roles: RoleRepository,
    hasher: Arc<dyn PasswordHasher>,
    jwt: JwtConfig,
}

impl UserService {
    pub fn new(
        users: UserRepository,
        roles: RoleRepository,
        hasher: Arc<dyn PasswordHasher>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            users,
            roles,
            hasher,
            jwt,
        }
    }

    /// Registers a user without a role.
    ///
    /// # Errors
    /// `AppError::Duplicate` if the email is already taken.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::duplicate("user", "email", email));
        }

        let hashed = self.hasher.hash(password)?;
        let user = self
            .users
            .create(NewUser::new(username, email, hashed, None))
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials, records `last_seen` and issues a token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(password, &user.hashed_password)? {
            tracing::debug!(user_id = user.id, "Rejected login with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let seen = UpdateUser {
            last_seen: Some(jiff::Timestamp::now().to_diesel()),
            ..UpdateUser::default()
        };
        let user = self.users.update(user.id, seen).await?;

        let token = jwt::generate_token(
            user.id,
            user.email.clone(),
            user.username.clone(),
            &self.jwt.secret,
            self.jwt.expiration_hours,
        )?;

        let expires_in = self
            .jwt
            .expiration_hours
            .checked_mul(3600)
            .ok_or_else(|| AppError::Internal {
                source: anyhow::anyhow!("token lifetime of {} hours overflows", self.jwt.expiration_hours),
            })?;

        Ok(LoginOutcome {
            user,
            token,
            expires_in,
        })
    }

    /// Gets a user by their ID.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    /// Changes the caller's username and/or email.
    ///
    /// # Errors
    /// `AppError::Duplicate` if the new email belongs to another user.
    pub async fn update_profile(
        &self,
        id: i32,
        username: Option<String>,
        email: Option<String>,
    ) -> AppResult<User> {
        let current = self.get_user(id).await?;

        if let Some(new_email) = email.as_deref() {
            if new_email != current.email {
                if let Some(other) = self.users.find_by_email(new_email).await? {
                    if other.id != id {
                        return Err(AppError::duplicate("user", "email", new_email));
                    }
                }
            }
        }

        let changes = UpdateUser {
            username,
            email,
            ..UpdateUser::default()
        };
        self.users.update(id, changes.touched()).await
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if !self.hasher.verify(old_password, &user.hashed_password)? {
            return Err(AppError::unauthorized("Old password is incorrect"));
        }

        self.set_password(id, new_password).await
    }

    /// Lists all users.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list_all().await
    }

    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list_all().await
    }

    /// Links a user to an existing role.
    pub async fn assign_role(&self, user_id: i32, role_id: i32) -> AppResult<User> {
        let mut user = self.get_user(user_id).await?;
        let role = self
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("role", "id", role_id))?;

        user.role_id = Some(role.id);
        user.updated_at = jiff::Timestamp::now().to_diesel();
        let user = self.users.save(&user).await?;

        tracing::info!(user_id, role = %role.name, "Role assigned");
        Ok(user)
    }

    /// Sets a new password without knowing the old one.
    pub async fn reset_password(&self, user_id: i32, new_password: &str) -> AppResult<()> {
        self.get_user(user_id).await?;
        self.set_password(user_id, new_password).await?;
        tracing::info!(user_id, "Password reset by administrator");
        Ok(())
    }

    /// Deletes a user.
    ///
    /// # Errors
    /// `AppError::NotFound` if no user has this ID.
    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        let affected = self.users.delete(user_id).await?;
        if affected == 0 {
            return Err(AppError::not_found("user", "id", user_id));
        }
        tracing::info!(user_id, "User deleted");
        Ok(())
    }

    /// True when the user exists and its role is the admin role.
    pub async fn is_admin(&self, user_id: i32) -> AppResult<bool> {
        let Some(role_id) = self
            .users
            .find_by_id(user_id)
            .await?
            .and_then(|user| user.role_id)
        else {
            return Ok(false);
        };

        Ok(self
            .roles
            .find_by_id(role_id)
            .await?
            .is_some_and(|role| role.is_admin()))
    }

    async fn set_password(&self, user_id: i32, password: &str) -> AppResult<()> {
        let changes = UpdateUser {
            hashed_password: Some(self.hasher.hash(password)?),
            ..UpdateUser::default()
        };
        self.users.update(user_id, changes.touched()).await?;
        Ok(())
    }
}
