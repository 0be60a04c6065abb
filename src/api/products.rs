use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::{CreateReviewRequest, UpdateProductRequest};
use crate::services::product_service;
use crate::utils::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub keyword: Option<String>,
    pub page_number: Option<u64>,
}

/// GET /api/products - catálogo paginado, filtro opcional por nome
#[get("")]
pub async fn get_products(
    db: web::Data<MongoDB>,
    query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
    // pageNumber ausente ou 0 cai na primeira página
    let page = query.page_number.unwrap_or(1).max(1);

    let response = product_service::list_products(&db, query.keyword.as_deref(), page).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/products/top - 3 mais bem avaliados.
/// Registrado antes de /{id} para não ser engolido pelo catch-all.
#[get("/top")]
pub async fn get_top_products(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let products = product_service::top_products(&db).await?;

    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/products/{id}
#[get("/{id}")]
pub async fn get_product(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product = product_service::get_product(&db, &path).await?;

    Ok(HttpResponse::Ok().json(product))
}

/// POST /api/products - admin; insere o placeholder padrão
#[post("")]
pub async fn create_product(
    AdminUser(admin): AdminUser,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /api/products - admin: {}", admin.email);

    let owner = admin
        .id
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let product = product_service::create_product(&db, &owner).await?;

    Ok(HttpResponse::Created().json(product))
}

/// PUT /api/products/{id} - admin
#[put("/{id}")]
pub async fn update_product(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PUT /api/products/{}", path);

    let product = product_service::update_product(&db, &path, &request).await?;

    Ok(HttpResponse::Ok().json(product))
}

/// DELETE /api/products/{id} - admin
#[delete("/{id}")]
pub async fn delete_product(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /api/products/{}", path);

    product_service::delete_product(&db, &path).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Product removed" })))
}

/// POST /api/products/{id}/reviews - uma avaliação por usuário
#[post("/{id}/reviews")]
pub async fn create_review(
    AuthenticatedUser(user): AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("⭐ POST /api/products/{}/reviews - user: {}", path, user.email);

    product_service::create_review(&db, &path, &user, &request).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "message": "Review added" })))
}
