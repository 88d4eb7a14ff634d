//! Startup seeding of the administrator account.
//!
//! `ensure_admin` runs once before the listener starts and guarantees that a
//! role named `admin` exists and that the configured admin user exists and is
//! linked to it. Running it again against an already-seeded store writes
//! nothing.

use std::time::Duration;

use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};
use crate::models::{ADMIN_ROLE, NewRole, NewUser};
use crate::repositories::{RoleStore, UserStore};
use crate::utils::password::PasswordHasher;

/// Identity of the administrator that must exist after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl From<&AdminConfig> for AdminAccount {
    fn from(config: &AdminConfig) -> Self {
        Self {
            email: config.email.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// What a seeding pass had to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub role_created: bool,
    pub user_created: bool,
    pub role_repaired: bool,
}

impl SeedReport {
    /// True when the store already satisfied both invariants.
    pub fn is_noop(&self) -> bool {
        !(self.role_created || self.user_created || self.role_repaired)
    }
}

/// Makes sure the admin role and the admin user exist and are linked.
///
/// Not-found lookups drive creation. Any other store or hasher error is
/// returned immediately, before any later write is attempted. Concurrent
/// first runs are arbitrated by the UNIQUE constraints on `roles.name` and
/// `users.email`; the loser sees `AppError::Duplicate`.
pub async fn ensure_admin(
    roles: &dyn RoleStore,
    users: &dyn UserStore,
    hasher: &dyn PasswordHasher,
    admin: &AdminAccount,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    let admin_role = match roles.find_by_name(ADMIN_ROLE).await? {
        Some(role) => role,
        None => {
            let role = roles.create(NewRole::new(ADMIN_ROLE)).await?;
            tracing::info!(role_id = role.id, "Created admin role");
            report.role_created = true;
            role
        }
    };

    match users.find_by_email(&admin.email).await? {
        None => {
            let hashed = hasher.hash(&admin.password)?;
            let user = users
                .create(NewUser::new(
                    admin.username.as_str(),
                    admin.email.as_str(),
                    hashed,
                    Some(admin_role.id),
                ))
                .await?;
            tracing::info!(user_id = user.id, email = %user.email, "Created admin user");
            report.user_created = true;
        }
        Some(mut user) if user.role_id != Some(admin_role.id) => {
            tracing::warn!(
                user_id = user.id,
                previous_role_id = ?user.role_id,
                admin_role_id = admin_role.id,
                "Admin user is not linked to the admin role, repairing"
            );
            user.role_id = Some(admin_role.id);
            users.save(&user).await?;
            report.role_repaired = true;
        }
        Some(_) => {}
    }

    Ok(report)
}

/// `ensure_admin` bounded by `limit`; expiry is reported as an internal error.
pub async fn ensure_admin_with_timeout(
    roles: &dyn RoleStore,
    users: &dyn UserStore,
    hasher: &dyn PasswordHasher,
    admin: &AdminAccount,
    limit: Duration,
) -> AppResult<SeedReport> {
    tokio::time::timeout(limit, ensure_admin(roles, users, hasher, admin))
        .await
        .map_err(|_| AppError::Internal {
            source: anyhow::anyhow!("admin seeding did not finish within {:?}", limit),
        })?
}
