use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use storefront_service::{api, database, utils};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let mongodb_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

    log::info!("🚀 Starting Storefront Service...");
    log::info!("📊 Database: {}", mongodb_uri);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // Diretório de uploads precisa existir antes do primeiro arquivo
    std::fs::create_dir_all(&upload_dir)?;

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000") // Frontend SPA
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials() // cookie de sessão cruza a origem
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            // Corpo JSON inválido também responde no envelope padrão
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                utils::error::AppError::BadRequest(err.to_string()).into()
            }))
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Liveness
            .route("/", web::get().to(api::health::root))
            .route("/health", web::get().to(api::health::health_check))
            // ==================== USERS ====================
            .service(
                web::scope("/api/users")
                    .route("/auth", web::post().to(api::users::login))
                    .route("/logout", web::post().to(api::users::logout))
                    .route("/profile", web::get().to(api::users::get_profile))
                    .route("/profile", web::put().to(api::users::update_profile))
                    .route("", web::post().to(api::users::register))
                    .route("", web::get().to(api::users::get_users))
                    .route("/{id}", web::get().to(api::users::get_user_by_id))
                    .route("/{id}", web::put().to(api::users::update_user))
                    .route("/{id}", web::delete().to(api::users::delete_user)),
            )
            // ==================== PRODUCTS ====================
            .service(
                web::scope("/api/products")
                    .service(api::products::get_products)
                    .service(api::products::create_product)
                    .service(api::products::get_top_products)
                    .service(api::products::create_review)
                    .service(api::products::update_product)
                    .service(api::products::delete_product)
                    .service(api::products::get_product), // catch-all, fica por último
            )
            // ==================== ORDERS ====================
            .service(
                web::scope("/api/orders")
                    .service(api::orders::add_order)
                    .service(api::orders::get_orders)
                    .service(api::orders::get_my_orders)
                    .service(api::orders::pay_order)
                    .service(api::orders::deliver_order)
                    .service(api::orders::get_order), // catch-all, fica por último
            )
            // ==================== UPLOAD ====================
            .service(
                web::scope("/api/upload")
                    .route("", web::post().to(api::upload::upload_image)),
            )
            // Payment provider config
            .route("/api/config/paypal", web::get().to(api::config::paypal_config))
            // Uploaded images served as static files
            .service(Files::new("/uploads", upload_dir.clone()))
            // Unmatched routes fall into the JSON 404 envelope
            .default_service(web::route().to(utils::error::route_not_found))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
