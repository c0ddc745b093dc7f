use async_trait::async_trait;
use sqlx::PgPool;

use crate::orders::store::{CustomerHistory, OrderStore};
use crate::orders::{FulfillmentStatus, NewOrder, Order, OrderError, OrderFilter, PaymentStatus};

const ORDER_COLUMNS: &str = "id, order_number, customer_name, phone, email, address, style, size, \
     number_of_faces, frame_id, reference_images, customer_notes, base_price, frame_price, \
     discount_amount, final_price, coupon_code, applied_offer_id, status, payment_status, \
     admin_notes, created_at, updated_at";

/// Repository for order operations
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    /// Create a new OrdersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrdersRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order, OrderError> {
        let order_number = order.order_number.clone();
        let created = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (
                order_number, customer_name, phone, email, address, style, size, number_of_faces,
                frame_id, reference_images, customer_notes, base_price, frame_price,
                discount_amount, final_price, coupon_code, applied_offer_id, status, payment_status
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(&order.order_number)
        .bind(&order.customer_name)
        .bind(&order.phone)
        .bind(&order.email)
        .bind(&order.address)
        .bind(&order.selection.style)
        .bind(&order.selection.size)
        .bind(order.selection.number_of_faces)
        .bind(order.selection.frame_id)
        .bind(&order.reference_images)
        .bind(&order.customer_notes)
        .bind(order.breakdown.base_price)
        .bind(order.breakdown.frame_price)
        .bind(order.breakdown.discount_amount)
        .bind(order.breakdown.final_price)
        .bind(&order.selection.coupon_code)
        .bind(order.applied_offer_id)
        .bind(FulfillmentStatus::default())
        .bind(PaymentStatus::default())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return OrderError::DuplicateOrderNumber(order_number);
                }
            }
            OrderError::from(e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {} FROM orders
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR payment_status = $2)
            ORDER BY created_at DESC, id DESC
            "#,
            ORDER_COLUMNS
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.payment_status.map(|p| p.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn update_status(&self, id: i64, status: FulfillmentStatus) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        order.ok_or(OrderError::NotFound)
    }

    async fn update_payment_status(
        &self,
        id: i64,
        payment_status: PaymentStatus,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET payment_status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(payment_status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        order.ok_or(OrderError::NotFound)
    }

    async fn update_admin_notes(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET admin_notes = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        order.ok_or(OrderError::NotFound)
    }
}

#[async_trait]
impl CustomerHistory for OrdersRepository {
    async fn has_prior_order(&self, phone: &str) -> Result<bool, OrderError> {
        let exists: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM orders
                WHERE phone = $1 AND (status = 'COMPLETED' OR payment_status = 'PAID')
            )
            "#,
        )
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }
}
