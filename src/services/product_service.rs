use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;

use crate::database::MongoDB;
use crate::models::{
    CreateReviewRequest, Product, ProductListResponse, ProductResponse, Review,
    UpdateProductRequest, User,
};
use crate::utils::error::{parse_object_id, AppError};

const PRODUCTS: &str = "products";

/// Tamanho fixo da página do catálogo
pub const PAGE_SIZE: u64 = 8;

/// pages = ceil(count / page_size)
pub fn total_pages(count: u64, page_size: u64) -> u64 {
    count.div_ceil(page_size)
}

/// Agregados derivados: (numReviews, rating médio)
pub fn recompute_rating(reviews: &[Review]) -> (i32, f64) {
    if reviews.is_empty() {
        return (0, 0.0);
    }

    let sum: f64 = reviews.iter().map(|r| r.rating).sum();
    (reviews.len() as i32, sum / reviews.len() as f64)
}

/// Uma avaliação por usuário por produto (varredura linear, como o contrato pede)
pub fn already_reviewed(reviews: &[Review], user_id: &ObjectId) -> bool {
    reviews.iter().any(|r| &r.user == user_id)
}

// Lista paginada com filtro opcional por substring no nome (case-insensitive)
pub async fn list_products(
    db: &MongoDB,
    keyword: Option<&str>,
    page: u64,
) -> Result<ProductListResponse, AppError> {
    let collection = db.collection::<Product>(PRODUCTS);

    let filter = match keyword {
        Some(kw) if !kw.is_empty() => doc! {
            "name": { "$regex": kw, "$options": "i" }
        },
        _ => doc! {},
    };

    let count = collection.count_documents(filter.clone()).await?;

    let products: Vec<Product> = collection
        .find(filter)
        .limit(PAGE_SIZE as i64)
        .skip(PAGE_SIZE * (page - 1))
        .await?
        .try_collect()
        .await?;

    Ok(ProductListResponse {
        products: products.into_iter().map(ProductResponse::from).collect(),
        page,
        pages: total_pages(count, PAGE_SIZE),
    })
}

pub async fn get_product(db: &MongoDB, id: &str) -> Result<ProductResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Product>(PRODUCTS);

    let product = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Resource not found".to_string()))?;

    Ok(ProductResponse::from(product))
}

// Top 3 por rating (ordem de empate indefinida)
pub async fn top_products(db: &MongoDB) -> Result<Vec<ProductResponse>, AppError> {
    let collection = db.collection::<Product>(PRODUCTS);

    let products: Vec<Product> = collection
        .find(doc! {})
        .sort(doc! { "rating": -1 })
        .limit(3)
        .await?
        .try_collect()
        .await?;

    Ok(products.into_iter().map(ProductResponse::from).collect())
}

// POST /api/products insere um placeholder fixo - o admin edita depois
pub async fn create_product(db: &MongoDB, owner: &ObjectId) -> Result<ProductResponse, AppError> {
    let collection = db.collection::<Product>(PRODUCTS);

    let mut product = Product {
        id: None,
        user: *owner,
        name: "Sample name".to_string(),
        image: "/images/sample.jpg".to_string(),
        brand: "Sample brand".to_string(),
        category: "Sample category".to_string(),
        description: "Sample description".to_string(),
        reviews: vec![],
        rating: 0.0,
        num_reviews: 0,
        price: 0.0,
        count_in_stock: 0,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    let result = collection.insert_one(&product).await?;
    product.id = result.inserted_id.as_object_id();

    Ok(ProductResponse::from(product))
}

// Sobrescrita integral dos campos editáveis
pub async fn update_product(
    db: &MongoDB,
    id: &str,
    request: &UpdateProductRequest,
) -> Result<ProductResponse, AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Product>(PRODUCTS);

    let set = doc! {
        "name": &request.name,
        "price": request.price,
        "description": &request.description,
        "image": &request.image,
        "brand": &request.brand,
        "category": &request.category,
        "countInStock": request.count_in_stock,
        "updatedAt": BsonDateTime::now(),
    };

    let product = collection
        .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(ProductResponse::from(product))
}

pub async fn delete_product(db: &MongoDB, id: &str) -> Result<(), AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Product>(PRODUCTS);

    let result = collection.delete_one(doc! { "_id": object_id }).await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(())
}

// Insere a avaliação e recalcula os agregados.
// Read-modify-write sem lock: avaliadores concorrentes podem desviar o
// agregado.
pub async fn create_review(
    db: &MongoDB,
    id: &str,
    reviewer: &User,
    request: &CreateReviewRequest,
) -> Result<(), AppError> {
    let object_id = parse_object_id(id)?;
    let collection = db.collection::<Product>(PRODUCTS);

    let product = collection
        .find_one(doc! { "_id": object_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let reviewer_id = reviewer
        .id
        .ok_or_else(|| AppError::Unauthorized("Not authorized, token failed".to_string()))?;

    if already_reviewed(&product.reviews, &reviewer_id) {
        return Err(AppError::BadRequest("Product already reviewed".to_string()));
    }

    let mut reviews = product.reviews;
    reviews.push(Review {
        id: Some(ObjectId::new()),
        user: reviewer_id,
        name: reviewer.name.clone(),
        rating: request.rating,
        comment: request.comment.clone(),
        created_at: Some(BsonDateTime::now()),
    });

    let (num_reviews, rating) = recompute_rating(&reviews);

    let reviews_bson = mongodb::bson::to_bson(&reviews)
        .map_err(|e| AppError::Database(format!("Failed to encode reviews: {}", e)))?;

    collection
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": {
                "reviews": reviews_bson,
                "numReviews": num_reviews,
                "rating": rating,
                "updatedAt": BsonDateTime::now(),
            }},
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(user: ObjectId, rating: f64) -> Review {
        Review {
            id: Some(ObjectId::new()),
            user,
            name: "Reviewer".into(),
            rating,
            comment: "ok".into(),
            created_at: None,
        }
    }

    #[test]
    fn test_total_pages_is_ceil() {
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(8, PAGE_SIZE), 1);
        assert_eq!(total_pages(9, PAGE_SIZE), 2);
        assert_eq!(total_pages(16, PAGE_SIZE), 2);
        assert_eq!(total_pages(17, PAGE_SIZE), 3);
    }

    #[test]
    fn test_rating_is_exact_mean() {
        let reviews = vec![
            review(ObjectId::new(), 5.0),
            review(ObjectId::new(), 4.0),
            review(ObjectId::new(), 3.0),
        ];

        let (num, rating) = recompute_rating(&reviews);
        assert_eq!(num, 3);
        assert!((rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rating_of_no_reviews_is_zero() {
        let (num, rating) = recompute_rating(&[]);
        assert_eq!(num, 0);
        assert_eq!(rating, 0.0);
    }

    #[test]
    fn test_num_reviews_tracks_length() {
        let mut reviews = vec![review(ObjectId::new(), 2.0)];
        let (num, _) = recompute_rating(&reviews);
        assert_eq!(num as usize, reviews.len());

        reviews.push(review(ObjectId::new(), 4.0));
        let (num, rating) = recompute_rating(&reviews);
        assert_eq!(num as usize, reviews.len());
        assert!((rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_review_detected_by_user() {
        let repeat = ObjectId::new();
        let reviews = vec![review(repeat, 5.0), review(ObjectId::new(), 1.0)];

        assert!(already_reviewed(&reviews, &repeat));
        assert!(!already_reviewed(&reviews, &ObjectId::new()));
    }
}
