use bcrypt::{hash, verify, DEFAULT_COST};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;

use crate::database::MongoDB;
use crate::models::{
    AdminUpdateUserRequest, LoginRequest, RegisterRequest, UpdateProfileRequest, User,
};
use crate::utils::error::{parse_object_id, AppError};

const USERS: &str = "users";

// User login - bcrypt verify contra o hash armazenado
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<User, AppError> {
    let collection = db.collection::<User>(USERS);

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let stored = user
        .password
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = verify(&request.password, stored)
        .map_err(|e| AppError::Database(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    Ok(user)
}

// User registration - email duplicado é 400
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<User, AppError> {
    let collection = db.collection::<User>(USERS);

    if collection
        .find_one(doc! { "email": &request.email })
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let hashed = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Database(format!("Failed to hash password: {}", e)))?;

    let mut user = User {
        id: None,
        name: request.name.clone(),
        email: request.email.clone(),
        password: Some(hashed),
        is_admin: false,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&user).await?;
    user.id = result.inserted_id.as_object_id();

    log::info!("✅ User registered: {}", user.email);

    Ok(user)
}

// Perfil do usuário logado (sem o hash)
pub async fn get_profile(db: &MongoDB, user_id: &ObjectId) -> Result<User, AppError> {
    let collection = db.collection::<User>(USERS);

    collection
        .find_one(doc! { "_id": user_id })
        .projection(doc! { "password": 0 })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// Atualiza nome/email; senha só é re-hasheada quando enviada
pub async fn update_profile(
    db: &MongoDB,
    user_id: &ObjectId,
    request: &UpdateProfileRequest,
) -> Result<User, AppError> {
    let collection = db.collection::<User>(USERS);

    let mut set = doc! { "updatedAt": BsonDateTime::now() };
    if let Some(name) = &request.name {
        set.insert("name", name);
    }
    if let Some(email) = &request.email {
        set.insert("email", email);
    }
    if let Some(password) = &request.password {
        let hashed = hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Database(format!("Failed to hash password: {}", e)))?;
        set.insert("password", hashed);
    }

    collection
        .find_one_and_update(doc! { "_id": user_id }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .projection(doc! { "password": 0 })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// ==================== ADMIN ====================

pub async fn list_users(db: &MongoDB) -> Result<Vec<User>, AppError> {
    let collection = db.collection::<User>(USERS);

    let users = collection
        .find(doc! {})
        .projection(doc! { "password": 0 })
        .await?
        .try_collect()
        .await?;

    Ok(users)
}

pub async fn get_user_by_id(db: &MongoDB, id: &str) -> Result<User, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<User>(USERS);

    collection
        .find_one(doc! { "_id": object_id })
        .projection(doc! { "password": 0 })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn update_user(
    db: &MongoDB,
    id: &str,
    request: &AdminUpdateUserRequest,
) -> Result<User, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<User>(USERS);

    let mut set = doc! {
        "isAdmin": request.is_admin,
        "updatedAt": BsonDateTime::now(),
    };
    if let Some(name) = &request.name {
        set.insert("name", name);
    }
    if let Some(email) = &request.email {
        set.insert("email", email);
    }

    collection
        .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .projection(doc! { "password": 0 })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// Admin não pode ser removido
pub async fn delete_user(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<User>(USERS);

    let user = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.is_admin {
        return Err(AppError::BadRequest("Cannot delete admin user".to_string()));
    }

    collection.delete_one(doc! { "_id": object_id }).await?;

    log::info!("🗑️ User removed: {}", user.email);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_roundtrip() {
        let hashed = hash("123456", 4).unwrap(); // custo baixo só no teste
        assert!(verify("123456", &hashed).unwrap());
        assert!(!verify("wrong-password", &hashed).unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_register_then_login() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/storefront_test".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let email = format!("{}@test.local", ObjectId::new().to_hex());
        let request = RegisterRequest {
            name: "Test".into(),
            email: email.clone(),
            password: "123456".into(),
        };

        let user = register(&db, &request).await.unwrap();
        assert!(user.id.is_some());

        // mesmo email de novo é 400
        let dup = register(&db, &request).await.unwrap_err();
        assert!(matches!(dup, AppError::BadRequest(_)));

        let logged = login(
            &db,
            &LoginRequest {
                email,
                password: "123456".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged.name, "Test");
    }
}
