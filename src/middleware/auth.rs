use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::MongoDB;
use crate::models::User;
use crate::utils::error::{is_development, AppError};

/// Nome do cookie HTTP-only que carrega o token de sessão
pub const TOKEN_COOKIE: &str = "jwt";

/// Validade do token e do cookie
const TOKEN_DAYS: i64 = 30;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user _id (hex)
    pub iat: usize,  // issued at
    pub exp: usize,  // expiration
    pub jti: String, // JWT ID
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

// Generate JWT token
pub fn generate_token(user_id: &str) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::days(TOKEN_DAYS)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id.to_string(),
        iat,
        exp,
        jti,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Database(format!("Failed to generate token: {}", e)))
}

// Verify JWT token (assinatura + expiração)
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Not authorized, token failed".to_string()))
}

/// Cookie de sessão emitido no login/registro: HTTP-only, site inteiro,
/// Secure fora de development
pub fn auth_cookie(token: String) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(!is_development())
        .max_age(CookieDuration::days(TOKEN_DAYS))
        .finish()
}

/// Cookie vazio e expirado para o logout
pub fn clear_auth_cookie() -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// Extractor: usuário autenticado via cookie `jwt`.
/// Resolve o usuário no banco (sem o hash da senha) e injeta no handler.
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = req
                .cookie(TOKEN_COOKIE)
                .map(|c| c.value().to_string())
                .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

            let claims = verify_token(&token)?;

            let user_id = ObjectId::parse_str(&claims.sub)
                .map_err(|_| AppError::Unauthorized("Not authorized, token failed".to_string()))?;

            let db = req
                .app_data::<web::Data<MongoDB>>()
                .ok_or_else(|| AppError::Database("MongoDB handle not configured".to_string()))?;

            let collection = db.collection::<User>("users");
            let user = collection
                .find_one(doc! { "_id": user_id })
                .projection(doc! { "password": 0 })
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .ok_or_else(|| {
                    AppError::Unauthorized("Not authorized, token failed".to_string())
                })?;

            Ok(AuthenticatedUser(user))
        })
    }
}

/// Extractor: autenticado E com flag de admin. Falha com 401, não 403.
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = AuthenticatedUser::from_request(req, payload);

        Box::pin(async move {
            let AuthenticatedUser(user) = fut.await?;

            if user.is_admin {
                Ok(AdminUser(user))
            } else {
                Err(AppError::Unauthorized(
                    "Not authorized as admin".to_string(),
                ))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let user_id = ObjectId::new().to_hex();
        let token = generate_token(&user_id).unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        // exp bem no passado para furar o leeway padrão de 60s
        let iat = (Utc::now() - Duration::days(31)).timestamp() as usize;
        let exp = (Utc::now() - Duration::days(1)).timestamp() as usize;
        let claims = Claims {
            sub: ObjectId::new().to_hex(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        let err = verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.to_string(), "Not authorized, token failed");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = generate_token(&ObjectId::new().to_hex()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("token-value".into());

        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(CookieDuration::days(30)));
    }

    #[test]
    fn test_logout_cookie_expires_immediately() {
        let cookie = clear_auth_cookie();

        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

    async fn protected(AuthenticatedUser(user): AuthenticatedUser) -> actix_web::HttpResponse {
        actix_web::HttpResponse::Ok().json(user.email)
    }

    #[actix_web::test]
    async fn test_request_without_cookie_is_401() {
        use actix_web::{http::StatusCode, test, web, App};

        let app =
            test::init_service(App::new().route("/me", web::get().to(protected))).await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Not authorized, no token");
    }

    #[actix_web::test]
    async fn test_request_with_garbage_cookie_is_401() {
        use actix_web::{http::StatusCode, test, web, App};

        let app =
            test::init_service(App::new().route("/me", web::get().to(protected))).await;

        // Token inválido falha na verificação antes de tocar o banco
        let req = test::TestRequest::get()
            .uri("/me")
            .cookie(Cookie::new(TOKEN_COOKIE, "not-a-jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Not authorized, token failed");
    }
}
