// Order persistence abstractions

use async_trait::async_trait;

use crate::orders::{FulfillmentStatus, NewOrder, Order, OrderError, OrderFilter, PaymentStatus};

/// Storage for placed orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order in its entry states
    ///
    /// Fails with `DuplicateOrderNumber` when the number is already taken.
    async fn insert(&self, order: NewOrder) -> Result<Order, OrderError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, OrderError>;

    /// Newest first
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError>;

    async fn update_status(&self, id: i64, status: FulfillmentStatus) -> Result<Order, OrderError>;

    async fn update_payment_status(
        &self,
        id: i64,
        payment_status: PaymentStatus,
    ) -> Result<Order, OrderError>;

    async fn update_admin_notes(&self, id: i64, notes: Option<String>) -> Result<Order, OrderError>;
}

/// Answers whether a customer has ordered before
#[async_trait]
pub trait CustomerHistory: Send + Sync {
    /// True when the normalised phone has at least one order that was
    /// completed or paid
    async fn has_prior_order(&self, phone: &str) -> Result<bool, OrderError>;
}
