//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for roles and users, plus the narrow
//! `RoleStore` / `UserStore` traits they implement.

mod role_repo;
mod store;
mod user_repo;

pub use role_repo::RoleRepository;
pub use store::{RoleStore, UserStore};
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub roles: RoleRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            roles: RoleRepository::new(pool),
        }
    }
}
