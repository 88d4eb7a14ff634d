use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Role;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "admin")]
    pub name: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
        }
    }
}
