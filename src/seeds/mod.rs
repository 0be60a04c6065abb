pub mod sample_data;

use mongodb::bson::doc;

use crate::database::MongoDB;
use crate::models::{Order, Product, User};
use crate::utils::error::AppError;

/// Remove todos os documentos das três collections
pub async fn destroy_data(db: &MongoDB) -> Result<(), AppError> {
    db.collection::<Order>("orders").delete_many(doc! {}).await?;
    db.collection::<Product>("products")
        .delete_many(doc! {})
        .await?;
    db.collection::<User>("users").delete_many(doc! {}).await?;

    log::info!("🗑️ Data destroyed!");

    Ok(())
}

/// Zera a base e importa os dados de exemplo. Os produtos ficam com o
/// admin recém-criado como dono.
pub async fn import_data(db: &MongoDB) -> Result<(), AppError> {
    destroy_data(db).await?;

    let users = sample_data::sample_users()?;
    let result = db.collection::<User>("users").insert_many(&users).await?;

    let admin_id = result
        .inserted_ids
        .get(&0)
        .and_then(|id| id.as_object_id())
        .ok_or_else(|| AppError::Database("Seed admin user id missing".to_string()))?;

    let products = sample_data::sample_products(admin_id);
    db.collection::<Product>("products")
        .insert_many(&products)
        .await?;

    log::info!(
        "🌱 Data imported! ({} users, {} products)",
        users.len(),
        products.len()
    );

    Ok(())
}
