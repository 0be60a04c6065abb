use actix_web::HttpResponse;

/// GET /api/config/paypal - client id do provedor para o checkout
pub async fn paypal_config() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "clientId": std::env::var("PAYPAL_CLIENT_ID").ok(),
    }))
}
