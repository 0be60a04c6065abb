use actix_web::{get, post, put, web, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::models::{CreateOrderRequest, PaymentConfirmation};
use crate::services::order_service;
use crate::utils::error::AppError;

/// POST /api/orders - checkout do carrinho
#[post("")]
pub async fn add_order(
    AuthenticatedUser(user): AuthenticatedUser,
    db: web::Data<MongoDB>,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "🛒 POST /api/orders - user: {} ({} items)",
        user.email,
        request.order_items.len()
    );

    let user_id = user
        .id
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let order = order_service::create_order(&db, &user_id, &request).await?;

    Ok(HttpResponse::Created().json(order))
}

/// GET /api/orders/mine - pedidos do usuário logado
#[get("/mine")]
pub async fn get_my_orders(
    AuthenticatedUser(user): AuthenticatedUser,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let orders = order_service::my_orders(&db, &user_id).await?;

    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id} - qualquer usuário autenticado, sem escopo de dono
#[get("/{id}")]
pub async fn get_order(
    _user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = order_service::get_order(&db, &path).await?;

    Ok(HttpResponse::Ok().json(order))
}

/// PUT /api/orders/{id}/pay - confirmação vinda do callback do provedor
#[put("/{id}/pay")]
pub async fn pay_order(
    _user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<PaymentConfirmation>,
) -> Result<HttpResponse, AppError> {
    log::info!("💰 PUT /api/orders/{}/pay", path);

    let order = order_service::pay_order(&db, &path, &request).await?;

    Ok(HttpResponse::Ok().json(order))
}

/// PUT /api/orders/{id}/deliver - admin
#[put("/{id}/deliver")]
pub async fn deliver_order(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("📦 PUT /api/orders/{}/deliver", path);

    let order = order_service::deliver_order(&db, &path).await?;

    Ok(HttpResponse::Ok().json(order))
}

/// GET /api/orders - admin; todos os pedidos
#[get("")]
pub async fn get_orders(
    _admin: AdminUser,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let orders = order_service::list_orders(&db).await?;

    Ok(HttpResponse::Ok().json(orders))
}
