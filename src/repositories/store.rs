//! Narrow persistence interfaces.
//!
//! Startup seeding depends on these traits only, so it can run against the
//! SQLite repositories or against in-memory fakes in tests.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewRole, NewUser, Role, User};

/// Lookup and creation of roles.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// `Ok(None)` when no role has this name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn create(&self, role: NewRole) -> AppResult<Role>;
}

/// Lookup, creation and full-row updates of users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `Ok(None)` when no user has this email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Writes every column of `user` back to its row.
    async fn save(&self, user: &User) -> AppResult<User>;
}
