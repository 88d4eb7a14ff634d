mod role;
mod user;

pub use role::{ADMIN_ROLE, NewRole, Role};
pub use user::{NewUser, UpdateUser, User};
