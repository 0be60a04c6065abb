use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Avaliação embutida no documento do produto
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub name: String,
    pub rating: f64, // 1-5
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
}

/// Documento da collection `products`.
/// `rating` e `numReviews` são agregados derivados de `reviews` -
/// recalculados a cada avaliação inserida.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Admin dono do cadastro
    pub user: ObjectId,
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub count_in_stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateReviewRequest {
    pub rating: f64,
    pub comment: String,
}

/// PUT /api/products/{id} - sobrescrita integral dos campos editáveis
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub count_in_stock: i32,
}

/// Review como a API devolve - ids em hex, datas ISO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub name: String,
    pub rating: f64,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        ReviewResponse {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            user: review.user.to_hex(),
            name: review.name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.map(|d| d.to_chrono()),
        }
    }
}

/// Produto como a API devolve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub reviews: Vec<ReviewResponse>,
    pub rating: f64,
    pub num_reviews: i32,
    pub price: f64,
    pub count_in_stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id.map(|id| id.to_hex()).unwrap_or_default(),
            user: product.user.to_hex(),
            name: product.name,
            image: product.image,
            brand: product.brand,
            category: product.category,
            description: product.description,
            reviews: product.reviews.into_iter().map(ReviewResponse::from).collect(),
            rating: product.rating,
            num_reviews: product.num_reviews,
            price: product.price,
            count_in_stock: product.count_in_stock,
            created_at: product.created_at.map(|d| d.to_chrono()),
            updated_at: product.updated_at.map(|d| d.to_chrono()),
        }
    }
}

/// GET /api/products - página + total de páginas (ceil(count / 8))
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub page: u64,
    pub pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: Some(ObjectId::new()),
            user: ObjectId::new(),
            name: "Sample name".into(),
            image: "/images/sample.jpg".into(),
            brand: "Sample brand".into(),
            category: "Sample category".into(),
            description: "Sample description".into(),
            reviews: vec![],
            rating: 0.0,
            num_reviews: 0,
            price: 0.0,
            count_in_stock: 0,
            created_at: Some(BsonDateTime::now()),
            updated_at: None,
        }
    }

    #[test]
    fn test_response_uses_hex_ids_and_camel_case() {
        let product = sample_product();
        let expected_id = product.id.unwrap().to_hex();

        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();

        assert_eq!(json["_id"], expected_id);
        assert!(json.get("numReviews").is_some());
        assert!(json.get("countInStock").is_some());
        assert!(json.get("num_reviews").is_none());
        // user vira hex, não extended JSON
        assert!(json["user"].is_string());
    }

    #[test]
    fn test_product_deserializes_with_defaults() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "user": { "$oid": "65a1b2c3d4e5f6a7b8c9d0e1" },
            "name": "Camera",
            "image": "/images/camera.jpg",
            "brand": "Canon",
            "category": "Electronics",
            "description": "DSLR",
        }))
        .unwrap();

        assert!(product.reviews.is_empty());
        assert_eq!(product.rating, 0.0);
        assert_eq!(product.num_reviews, 0);
        assert_eq!(product.count_in_stock, 0);
    }

    #[test]
    fn test_review_response_carries_reviewer() {
        let reviewer = ObjectId::new();
        let review = Review {
            id: Some(ObjectId::new()),
            user: reviewer,
            name: "Pedro".into(),
            rating: 4.0,
            comment: "Muito bom".into(),
            created_at: Some(BsonDateTime::now()),
        };

        let response = ReviewResponse::from(review);
        assert_eq!(response.user, reviewer.to_hex());
        assert_eq!(response.rating, 4.0);
        assert!(response.created_at.is_some());
    }
}
