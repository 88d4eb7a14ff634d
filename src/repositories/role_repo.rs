//! Role repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewRole, Role};
use crate::repositories::RoleStore;

/// Role repository holding an async connection pool.
#[derive(Clone)]
pub struct RoleRepository {
    pool: AsyncDbPool,
}

impl RoleRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Finds a role by its ID.
    pub async fn find_by_id(&self, role_id: i32) -> AppResult<Option<Role>> {
        use crate::schema::roles::dsl::*;
        let mut conn = self.pool.get().await?;

        roles
            .filter(id.eq(role_id))
            .select(Role::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists all roles ordered by ID.
    pub async fn list_all(&self) -> AppResult<Vec<Role>> {
        use crate::schema::roles::dsl::*;
        let mut conn = self.pool.get().await?;

        roles
            .order(id.asc())
            .select(Role::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn find_by_name(&self, role_name: &str) -> AppResult<Option<Role>> {
        use crate::schema::roles::dsl::*;
        let mut conn = self.pool.get().await?;

        roles
            .filter(name.eq(role_name))
            .select(Role::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn create(&self, new_role: NewRole) -> AppResult<Role> {
        use crate::schema::roles::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(roles)
            .values(&new_role)
            .returning(Role::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create role"))
    }
}
