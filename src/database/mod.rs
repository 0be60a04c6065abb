use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool otimizado
        client_options.max_pool_size = Some(20);  // Max 20 conexões simultâneas
        client_options.min_pool_size = Some(5);   // Mantém 5 conexões sempre vivas
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));  // 5min idle

        // Timeouts otimizados
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            // URI sem path cai no nome padrão, não no host:porta
            .filter(|s| !s.is_empty() && !s.contains(':'))
            .unwrap_or("storefront");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // Index for users: (email) unique - registro exige email único
        let users = self.database().collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for orders: (user) - for fast "my orders" queries
        let orders = self.database().collection::<mongodb::bson::Document>("orders");

        let orders_user_index = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .build();

        match orders.create_index(orders_user_index).await {
            Ok(_) => log::info!("   ✅ Index created: orders(user)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for products: (rating desc) - top rated query
        let products = self.database().collection::<mongodb::bson::Document>("products");

        let products_rating_index = IndexModel::builder()
            .keys(doc! { "rating": -1 })
            .build();

        match products.create_index(products_rating_index).await {
            Ok(_) => log::info!("   ✅ Index created: products(rating)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_connection_and_indexes() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/storefront".to_string());

        let db = MongoDB::new(&uri).await;
        assert!(db.is_ok());
    }
}
