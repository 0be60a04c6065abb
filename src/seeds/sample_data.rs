use bcrypt::{hash, DEFAULT_COST};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::models::{Product, User};
use crate::utils::error::AppError;

/// Usuários de exemplo - o primeiro é o admin dono dos produtos
pub fn sample_users() -> Result<Vec<User>, AppError> {
    let password = hash("123456", DEFAULT_COST)
        .map_err(|e| AppError::Database(format!("Failed to hash seed password: {}", e)))?;

    let user = |name: &str, email: &str, is_admin: bool| User {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        password: Some(password.clone()),
        is_admin,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    Ok(vec![
        user("Admin User", "admin@email.com", true),
        user("André Santos", "andre@email.com", false),
        user("Pedro", "pedro@email.com", false),
    ])
}

/// Catálogo de exemplo. Agregados zerados - rating/numReviews só nascem
/// de avaliações reais.
pub fn sample_products(owner: ObjectId) -> Vec<Product> {
    let product = |name: &str, image: &str, brand: &str, category: &str, description: &str, price: f64, stock: i32| {
        Product {
            id: None,
            user: owner,
            name: name.to_string(),
            image: image.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            reviews: vec![],
            rating: 0.0,
            num_reviews: 0,
            price,
            count_in_stock: stock,
            created_at: Some(BsonDateTime::now()),
            updated_at: Some(BsonDateTime::now()),
        }
    };

    vec![
        product(
            "Airpods Wireless Bluetooth Headphones",
            "/images/airpods.jpg",
            "Apple",
            "Electronics",
            "Bluetooth technology lets you connect it with compatible devices wirelessly. High-quality AAC audio offers immersive listening experience.",
            89.99,
            10,
        ),
        product(
            "iPhone 11 Pro 256GB Memory",
            "/images/phone.jpg",
            "Apple",
            "Electronics",
            "Introducing the iPhone 11 Pro. A transformative triple-camera system that adds tons of capability without complexity.",
            599.99,
            7,
        ),
        product(
            "Canon EOS 80D DSLR Camera",
            "/images/camera.jpg",
            "Canon",
            "Electronics",
            "Characterized by versatile imaging specs, the Canon EOS 80D further clarifies itself using a pair of robust focusing systems.",
            929.99,
            5,
        ),
        product(
            "Sony Playstation 4 Pro White Version",
            "/images/playstation.jpg",
            "Sony",
            "Electronics",
            "The ultimate home entertainment center starts with PlayStation. Whether you are into gaming, HD movies or music.",
            399.99,
            11,
        ),
        product(
            "Logitech G-Series Gaming Mouse",
            "/images/mouse.jpg",
            "Logitech",
            "Electronics",
            "Get a better handle on your games with this Logitech LIGHTSYNC gaming mouse with six programmable buttons.",
            49.99,
            7,
        ),
        product(
            "Amazon Echo Dot 3rd Generation",
            "/images/alexa.jpg",
            "Amazon",
            "Electronics",
            "Meet Echo Dot - our most popular smart speaker with a fabric design. It is our most compact smart speaker that fits perfectly into small spaces.",
            29.99,
            0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::product_service::recompute_rating;

    #[test]
    fn test_first_seed_user_is_the_only_admin() {
        let users = sample_users().unwrap();

        assert!(users[0].is_admin);
        assert!(users.iter().skip(1).all(|u| !u.is_admin));
        assert!(users.iter().all(|u| u.password.is_some()));
    }

    #[test]
    fn test_seed_products_keep_aggregates_consistent() {
        let owner = ObjectId::new();
        let products = sample_products(owner);

        assert!(!products.is_empty());
        for p in &products {
            let (num, rating) = recompute_rating(&p.reviews);
            assert_eq!(p.num_reviews, num);
            assert_eq!(p.rating, rating);
            assert_eq!(p.user, owner);
        }
    }
}
