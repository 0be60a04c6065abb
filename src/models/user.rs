use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Documento da collection `users`
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// Hash bcrypt. None quando a consulta projeta o campo fora.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// PUT /api/users/profile - campos ausentes mantêm o valor atual
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/users/{id} - isAdmin ausente vira false (contrato do painel admin)
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Shape de usuário devolvido pela API - nunca carrega o hash da senha
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_never_carries_password() {
        let user = User {
            id: Some(ObjectId::new()),
            name: "Admin User".into(),
            email: "admin@email.com".into(),
            password: Some("$2a$12$hash".into()),
            is_admin: true,
            created_at: None,
            updated_at: None,
        };

        let response = UserResponse::from(&user);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["_id"], user.id.unwrap().to_hex());
        assert_eq!(json["isAdmin"], true);
    }

    #[test]
    fn test_user_document_field_names() {
        let json = serde_json::json!({
            "_id": ObjectId::new().to_hex(),
            "name": "Pedro",
            "email": "pedro@email.com",
            "password": "$2a$12$hash",
            "isAdmin": false,
        });

        // _id como string não desserializa em ObjectId; só valida os demais campos
        let user: User = serde_json::from_value(serde_json::json!({
            "name": json["name"],
            "email": json["email"],
            "password": json["password"],
            "isAdmin": json["isAdmin"],
        }))
        .unwrap();

        assert_eq!(user.name, "Pedro");
        assert!(!user.is_admin);
        assert!(user.password.is_some());
    }

    #[test]
    fn test_is_admin_defaults_false() {
        // Documentos antigos sem o campo isAdmin
        let user: User = serde_json::from_value(serde_json::json!({
            "name": "Pedro",
            "email": "pedro@email.com",
        }))
        .unwrap();

        assert!(!user.is_admin);
        assert!(user.password.is_none());
    }
}
