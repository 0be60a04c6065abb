use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::auth::{auth_cookie, clear_auth_cookie, generate_token};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::{
    AdminUpdateUserRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, UserResponse,
};
use crate::services::user_service;
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/users/auth",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie issued", body = UserResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /api/users/auth - email: {}", request.email);

    let user = user_service::login(&db, &request).await?;
    let token = generate_token(&user.id.map(|id| id.to_hex()).unwrap_or_default())?;

    log::info!("✅ Login successful: {}", user.email);

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(token))
        .json(UserResponse::from(&user)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, session cookie issued", body = UserResponse),
        (status = 400, description = "User already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /api/users - email: {}", request.email);

    let user = user_service::register(&db, &request).await?;
    let token = generate_token(&user.id.map(|id| id.to_hex()).unwrap_or_default())?;

    Ok(HttpResponse::Created()
        .cookie(auth_cookie(token))
        .json(UserResponse::from(&user)))
}

#[utoipa::path(
    post,
    path = "/api/users/logout",
    tag = "Users",
    responses((status = 200, description = "Session cookie cleared"))
)]
pub async fn logout() -> HttpResponse {
    log::info!("👋 POST /api/users/logout");

    HttpResponse::Ok()
        .cookie(clear_auth_cookie())
        .json(serde_json::json!({ "message": "Logged out successfully" }))
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    AuthenticatedUser(user): AuthenticatedUser,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile = user_service::get_profile(&db, &user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&profile)))
}

pub async fn update_profile(
    AuthenticatedUser(user): AuthenticatedUser,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PUT /api/users/profile - user: {}", user.email);

    let user_id = user
        .id
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let updated = user_service::update_profile(&db, &user_id, &request).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}

// ==================== ADMIN ====================

pub async fn get_users(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let users = user_service::list_users(&db).await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user_by_id(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::get_user_by_id(&db, &path).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

pub async fn update_user(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<AdminUpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PUT /api/users/{}", path);

    let updated = user_service::update_user(&db, &path, &request).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}

pub async fn delete_user(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /api/users/{}", path);

    user_service::delete_user(&db, &path).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User removed" })))
}
