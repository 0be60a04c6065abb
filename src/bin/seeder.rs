use dotenv::dotenv;
use std::env;

use storefront_service::{database, seeds};

/// Utilitário de seed: `cargo run --bin seeder` importa os dados de
/// exemplo, `cargo run --bin seeder -- -d` apenas destrói. Sai com 0 em
/// sucesso e 1 em falha.
#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mongodb_uri = match env::var("MONGODB_URI") {
        Ok(uri) => uri,
        Err(_) => {
            log::error!("❌ MONGODB_URI must be set");
            std::process::exit(1);
        }
    };

    let db = match database::MongoDB::new(&mongodb_uri).await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    let destroy = env::args().any(|arg| arg == "-d");

    let result = if destroy {
        seeds::destroy_data(&db).await
    } else {
        seeds::import_data(&db).await
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            log::error!("❌ Seed failed: {}", e);
            std::process::exit(1);
        }
    }
}
