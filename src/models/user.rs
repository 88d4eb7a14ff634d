use diesel::prelude::*;
use jiff_diesel::{Timestamp, ToDiesel};

/// User model for reading from database
///
/// Also used as a full-row changeset by `UserStore::save`, so `None` in
/// `role_id` is written as NULL rather than skipped.
#[derive(Debug, Queryable, Selectable, Identifiable, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub role_id: Option<i32>,
    pub last_seen: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// NewUser model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub role_id: Option<i32>,
    pub last_seen: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewUser {
    /// Builds a user stamped with the current time in all timestamp columns.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
        role_id: Option<i32>,
    ) -> Self {
        let now = jiff::Timestamp::now();
        Self {
            username: username.into(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            role_id,
            last_seen: now.to_diesel(),
            created_at: now.to_diesel(),
            updated_at: now.to_diesel(),
        }
    }
}

/// UpdateUser model for partial updates
/// Derives AsChangeset for UPDATE operations with optional fields
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub last_seen: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl UpdateUser {
    /// Marks the changeset as a modification made now.
    pub fn touched(mut self) -> Self {
        self.updated_at = Some(jiff::Timestamp::now().to_diesel());
        self
    }
}
