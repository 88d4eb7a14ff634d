//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` - Registration and login
//! - `user` - Profile and admin user management
//! - `role` - Role listing
//! - `error` - Common error response DTOs

mod auth;
mod error;
mod health;
mod message;
mod role;
mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use message::MessageResponse;
pub use role::RoleResponse;
pub use user::{
    AssignRoleRequest, ChangePasswordRequest, ResetPasswordRequest, UpdateProfileRequest,
    UserResponse,
};
