use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{OfferCatalog, PricingCatalog};
use crate::orders::order_number::generate_order_number;
use crate::orders::store::{CustomerHistory, OrderStore};
use crate::orders::{
    CreateOrderRequest, NewOrder, Order, OrderError, OrderFilter, OrderSelection, PriceCalculator,
    Quote, StatusField, StatusMachine,
};
use crate::pricing::{PriceResolver, PromotionOutcome, PromotionRequest, PromotionSelector};
use crate::validation::normalize_phone;

/// Attempts at finding an unused order number before giving up
const MAX_ORDER_NUMBER_ATTEMPTS: usize = 3;

/// A freshly placed order together with the promotion decision behind it
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub promotion: PromotionOutcome,
}

/// Service for order business logic
#[derive(Clone)]
pub struct OrderService {
    pricing: Arc<dyn PricingCatalog>,
    offers: Arc<dyn OfferCatalog>,
    orders: Arc<dyn OrderStore>,
    history: Arc<dyn CustomerHistory>,
}

impl OrderService {
    pub fn new(
        pricing: Arc<dyn PricingCatalog>,
        offers: Arc<dyn OfferCatalog>,
        orders: Arc<dyn OrderStore>,
        history: Arc<dyn CustomerHistory>,
    ) -> Self {
        Self {
            pricing,
            offers,
            orders,
            history,
        }
    }

    /// Price a selection without placing an order
    ///
    /// Without a phone number the customer is treated as new, so first-order
    /// offers show up in the quote; placement re-checks with the real number.
    pub async fn quote(
        &self,
        selection: &OrderSelection,
        phone: Option<&str>,
    ) -> Result<Quote, OrderError> {
        self.quote_at(selection, phone, Utc::now()).await
    }

    /// `quote` evaluated at a fixed instant
    pub async fn quote_at(
        &self,
        selection: &OrderSelection,
        phone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Quote, OrderError> {
        let rules = self.pricing.active_rules().await?;
        let base_price = PriceResolver::resolve(
            &selection.style,
            &selection.size,
            selection.number_of_faces,
            &rules,
        )?;

        let frame_price = match selection.frame_id {
            Some(frame_id) => {
                let frames = self.pricing.active_frames().await?;
                let frame = frames
                    .iter()
                    .find(|f| f.id == frame_id)
                    .ok_or(OrderError::FrameNotFound(frame_id))?;
                Some(frame.price)
            }
            None => None,
        };

        let is_first_order = match phone {
            Some(phone) => !self.history.has_prior_order(&normalize_phone(phone)).await?,
            None => true,
        };

        let offers = self.offers.active_offers().await?;
        let promotion = PromotionSelector::select(
            &PromotionRequest {
                base_price,
                coupon_code: selection.coupon_code.as_deref(),
                is_first_order,
                style: &selection.style,
                now,
            },
            &offers,
        );

        Ok(Quote {
            breakdown: PriceCalculator::assemble(base_price, frame_price, &promotion),
            is_first_order,
            promotion,
        })
    }

    /// Price and persist a new order in `PENDING / PENDING`
    pub async fn place_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<PlacedOrder, OrderError> {
        let phone = normalize_phone(&request.phone);
        let mut selection = request.selection();

        let now = Utc::now();
        let quote = self.quote_at(&selection, Some(&phone), now).await?;

        // Only keep a code on the order when it bought something
        selection.coupon_code = selection
            .coupon_code
            .filter(|_| quote.promotion.is_applied())
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        let draft = NewOrder {
            order_number: String::new(),
            customer_name: request.customer_name.trim().to_string(),
            phone,
            email: request.email.map(|e| e.trim().to_string()),
            address: request
                .address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            selection,
            reference_images: request.reference_images,
            customer_notes: request.customer_notes,
            breakdown: quote.breakdown,
            applied_offer_id: quote.promotion.applied_offer_id,
        };

        for attempt in 1..=MAX_ORDER_NUMBER_ATTEMPTS {
            let new_order = NewOrder {
                order_number: generate_order_number(now),
                ..draft.clone()
            };

            match self.orders.insert(new_order).await {
                Ok(order) => {
                    tracing::info!(
                        "Placed order {} ({} / {} / {} face(s)) final price {}",
                        order.order_number,
                        order.style,
                        order.size,
                        order.number_of_faces,
                        order.final_price
                    );
                    return Ok(PlacedOrder {
                        order,
                        promotion: quote.promotion,
                    });
                }
                Err(OrderError::DuplicateOrderNumber(number)) => {
                    tracing::warn!(
                        "Order number {} already taken (attempt {}/{})",
                        number,
                        attempt,
                        MAX_ORDER_NUMBER_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(OrderError::OrderNumberExhausted)
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        self.orders.list(filter).await
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, OrderError> {
        self.orders.find_by_id(id).await?.ok_or(OrderError::NotFound)
    }

    /// Move the fulfillment status; any member value is accepted
    pub async fn update_status(&self, id: i64, requested: &str) -> Result<Order, OrderError> {
        let order = self.get_order(id).await?;
        let updated = StatusMachine::transition(&order, StatusField::Fulfillment, requested)?;

        let saved = self.orders.update_status(id, updated.status).await?;
        tracing::info!(
            "Order {} status {} -> {}",
            saved.order_number,
            order.status,
            saved.status
        );
        Ok(saved)
    }

    /// Move the payment status; any member value is accepted
    pub async fn update_payment_status(
        &self,
        id: i64,
        requested: &str,
    ) -> Result<Order, OrderError> {
        let order = self.get_order(id).await?;
        let updated = StatusMachine::transition(&order, StatusField::Payment, requested)?;

        let saved = self
            .orders
            .update_payment_status(id, updated.payment_status)
            .await?;
        tracing::info!(
            "Order {} payment {} -> {}",
            saved.order_number,
            order.payment_status,
            saved.payment_status
        );
        Ok(saved)
    }

    /// Replace the admin note; blank input clears it
    pub async fn update_admin_notes(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<Order, OrderError> {
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self.orders.update_admin_notes(id, notes).await
    }
}
