pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod orders;
pub mod pricing;
pub mod validation;

use axum::{
    extract::FromRef,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use auth::TokenService;
use catalog::{handlers as catalog_handlers, CatalogService, OfferCatalog, PricingCatalog};
use orders::{handlers as order_handlers, CustomerHistory, OrderService, OrderStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wire services over a catalog backend and an order backend
    pub fn new<C, O>(catalog: Arc<C>, orders: Arc<O>, tokens: Arc<TokenService>) -> Self
    where
        C: PricingCatalog + OfferCatalog + 'static,
        O: OrderStore + CustomerHistory + 'static,
    {
        Self {
            catalog: CatalogService::new(catalog.clone(), catalog.clone()),
            orders: OrderService::new(catalog.clone(), catalog, orders.clone(), orders),
            tokens,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing middleware
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Public storefront
        .route("/api/pricing", get(catalog_handlers::list_active_pricing_handler))
        .route("/api/frames", get(catalog_handlers::list_frames_handler))
        .route("/api/orders/quote", post(order_handlers::quote_handler))
        .route("/api/orders", post(order_handlers::create_order_handler))
        // Admin: orders
        .route("/api/admin/orders", get(order_handlers::list_orders_handler))
        .route("/api/admin/orders/:id", get(order_handlers::get_order_handler))
        .route(
            "/api/admin/orders/:id/status",
            patch(order_handlers::update_order_status_handler),
        )
        .route(
            "/api/admin/orders/:id/payment",
            patch(order_handlers::update_payment_status_handler),
        )
        .route(
            "/api/admin/orders/:id/notes",
            patch(order_handlers::update_notes_handler),
        )
        // Admin: offers
        .route(
            "/api/admin/offers",
            get(catalog_handlers::list_offers_handler).post(catalog_handlers::create_offer_handler),
        )
        .route(
            "/api/admin/offers/:id",
            get(catalog_handlers::get_offer_handler)
                .put(catalog_handlers::update_offer_handler)
                .delete(catalog_handlers::delete_offer_handler),
        )
        // Admin: pricing rules
        .route(
            "/api/admin/pricing",
            get(catalog_handlers::list_pricing_rules_handler)
                .post(catalog_handlers::create_pricing_rule_handler),
        )
        .route(
            "/api/admin/pricing/:id",
            put(catalog_handlers::update_pricing_rule_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
