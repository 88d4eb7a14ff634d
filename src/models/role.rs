use diesel::prelude::*;
use serde::Deserialize;

/// Name of the role that unlocks the administrative endpoints.
pub const ADMIN_ROLE: &str = "admin";

/// Role model for reading from database
#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::roles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Role {
    pub id: i32,
    pub name: String,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_ROLE
    }
}

/// NewRole model for inserting new records
#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::roles)]
pub struct NewRole {
    pub name: String,
}

impl NewRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
