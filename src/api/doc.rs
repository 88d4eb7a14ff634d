use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const PROFILE_TAG: &str = "Profile";
pub const ADMIN_TAG: &str = "Admin";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users Service",
        description = "User registration, authentication and administration",
    ),
    modifiers(&SecurityAddon),
    components(schemas(crate::api::dto::ErrorResponse)),
    tags(
        (name = AUTH_TAG, description = "Registration and login"),
        (name = PROFILE_TAG, description = "The authenticated user's own account"),
        (name = ADMIN_TAG, description = "User and role administration, admin role required"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer Token Authentication"))
                        .build(),
                ),
            )
        }
    }
}
