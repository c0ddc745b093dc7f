// Orders module
// Quoting, placement and the admin lifecycle of portrait orders

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod order_number;
pub mod price_calculator;
pub mod repository;
pub mod service;
pub mod status_machine;
pub mod store;

pub use error::OrderError;
pub use memory::InMemoryOrderStore;
pub use models::*;
pub use price_calculator::PriceCalculator;
pub use repository::OrdersRepository;
pub use service::{OrderService, PlacedOrder};
pub use status_machine::{InvalidTransition, StatusMachine};
pub use store::{CustomerHistory, OrderStore};
