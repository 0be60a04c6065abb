use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use std::fmt;

/// Erro unificado da aplicação. Toda falha vira o envelope JSON
/// `{"message": ..., "stack": ...}` - stack só em development.
#[derive(Debug, Clone)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Database(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Unauthorized(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let stack = if is_development() {
            Some(format!("{:?}", self))
        } else {
            None
        };

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string(),
            "stack": stack,
        }))
    }
}

/// APP_ENV: "development" (default) ou "production"
pub fn is_development() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v != "production")
        .unwrap_or(true)
}

/// Converte um id vindo da URL em ObjectId.
/// Id malformado responde 404, nunca 500 (mesmo contrato do CastError).
pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::NotFound("Resource not found".to_string()))
}

/// Default service para rotas não mapeadas
pub async fn route_not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!("Not Found - {}", req.path())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_passes_through() {
        let err = AppError::NotFound("Order not found".into());
        assert_eq!(err.to_string(), "Order not found");

        let err = AppError::Database("pool timeout".into());
        assert_eq!(err.to_string(), "Database error: pool timeout");
    }

    #[test]
    fn test_invalid_object_id_maps_to_404() {
        let err = parse_object_id("not-a-hex-id").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Resource not found");

        let ok = parse_object_id("65a1b2c3d4e5f6a7b8c9d0e1");
        assert!(ok.is_ok());
    }

    #[actix_web::test]
    async fn test_unmatched_route_gets_json_404_envelope() {
        use actix_web::{test, web, App};

        let app = test::init_service(
            App::new().default_service(web::route().to(route_not_found)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Not Found - /api/nope");
        assert!(body.as_object().unwrap().contains_key("stack"));
    }

    #[test]
    fn test_stack_suppressed_in_production() {
        // Sequencial no mesmo teste: set_var em testes paralelos causa corrida
        std::env::set_var("APP_ENV", "production");
        assert!(!is_development());

        std::env::set_var("APP_ENV", "development");
        assert!(is_development());

        std::env::remove_var("APP_ENV");
        assert!(is_development());
    }
}
