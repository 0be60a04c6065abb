use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Service API",
        version = "1.0.0",
        description = "REST API for the storefront: product catalog, users, orders and image upload. \n\n**Authentication:** session JWT carried in an HTTP-only cookie, issued on login/registration.",
    ),
    paths(
        // Users
        crate::api::users::login,
        crate::api::users::register,
        crate::api::users::logout,
        crate::api::users::get_profile,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::LoginRequest,
            crate::models::RegisterRequest,
            crate::models::UpdateProfileRequest,
            crate::models::UserResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Registration, login/logout and profile management. Admin-only user administration shares the same scope."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    )
)]
pub struct ApiDoc;
