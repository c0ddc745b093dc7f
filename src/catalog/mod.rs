// Catalog module
// Storage, caching and admin maintenance of pricing rules, frames and offers

pub mod cache;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod repository;
pub mod service;
pub mod store;

pub use cache::CachedCatalog;
pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalog;
pub use repository::PgCatalogRepository;
pub use service::CatalogService;
pub use store::{OfferCatalog, PricingCatalog};
