//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

pub mod bootstrap;
mod user_service;

pub use bootstrap::{AdminAccount, SeedReport, ensure_admin, ensure_admin_with_timeout};
pub use user_service::{LoginOutcome, UserService};

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::repositories::Repositories;
use crate::utils::password::PasswordHasher;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
}

impl Services {
    pub fn new(repos: Repositories, hasher: Arc<dyn PasswordHasher>, jwt: JwtConfig) -> Self {
        Self {
            users: UserService::new(repos.users, repos.roles, hasher, jwt),
        }
    }
}
