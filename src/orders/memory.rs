// In-memory order store for tests and database-less runs

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::orders::store::{CustomerHistory, OrderStore};
use crate::orders::{FulfillmentStatus, NewOrder, Order, OrderError, OrderFilter, PaymentStatus};

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed existing orders, e.g. a returning customer's history
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: RwLock::new(orders),
        }
    }

    async fn modify(
        &self,
        id: i64,
        change: impl FnOnce(&mut Order) + Send,
    ) -> Result<Order, OrderError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(OrderError::NotFound)?;
        change(order);
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order, OrderError> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.order_number == order.order_number) {
            return Err(OrderError::DuplicateOrderNumber(order.order_number));
        }

        let id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let created = order.into_order(id, Utc::now());
        orders.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, OrderError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matching)
    }

    async fn update_status(&self, id: i64, status: FulfillmentStatus) -> Result<Order, OrderError> {
        self.modify(id, |o| o.status = status).await
    }

    async fn update_payment_status(
        &self,
        id: i64,
        payment_status: PaymentStatus,
    ) -> Result<Order, OrderError> {
        self.modify(id, |o| o.payment_status = payment_status).await
    }

    async fn update_admin_notes(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<Order, OrderError> {
        self.modify(id, |o| o.admin_notes = notes).await
    }
}

#[async_trait]
impl CustomerHistory for InMemoryOrderStore {
    async fn has_prior_order(&self, phone: &str) -> Result<bool, OrderError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().any(|o| {
            o.phone == phone
                && (o.status == FulfillmentStatus::Completed
                    || o.payment_status == PaymentStatus::Paid)
        }))
    }
}
