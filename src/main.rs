use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use portrait_orders::{
    auth::TokenService,
    catalog::{CachedCatalog, PgCatalogRepository},
    config::AppConfig,
    create_router, db,
    orders::OrdersRepository,
    AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Portrait Orders API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let catalog = Arc::new(CachedCatalog::with_ttl(
        PgCatalogRepository::new(db_pool.clone()),
        config.catalog_cache_ttl,
    ));
    let orders = Arc::new(OrdersRepository::new(db_pool));
    let tokens = Arc::new(TokenService::new(config.jwt_secret.clone()));

    let app = create_router(AppState::new(catalog, orders, tokens));

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Portrait Orders API is running on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
