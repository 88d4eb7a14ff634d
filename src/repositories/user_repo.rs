//! User repository for async database operations.
//!
//! Provides CRUD operations for the users table using diesel_async.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserStore;

/// User repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<UserRepository>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Finds a user by their ID.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists all users ordered by ID.
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Updates the fields set in `update_data`; `None` fields are left alone.
    ///
    /// # Errors
    /// `AppError::NotFound` when no user has this ID.
    pub async fn update(&self, user_id: i32, update_data: UpdateUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set(&update_data)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update user"))?
            .ok_or_else(|| AppError::not_found("user", "id", user_id))
    }

    /// Deletes a user from the database.
    ///
    /// # Returns
    /// The number of affected rows (0 or 1)
    pub async fn delete(&self, user_id: i32) -> AppResult<usize> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(users.filter(id.eq(user_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(email.eq(user_email))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create user"))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        diesel::update(user)
            .set(user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "save user"))?
            .ok_or_else(|| AppError::not_found("user", "id", user.id))
    }
}
