use std::str::FromStr;

use crate::orders::{FulfillmentStatus, Order, PaymentStatus, StatusField};

/// A requested value that is not a member of the field's enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value '{requested}'")]
pub struct InvalidTransition {
    pub field: StatusField,
    pub requested: String,
}

/// Guard for order status changes
///
/// Fulfillment and payment move independently. The only rule is membership:
/// the requested value must be spelled exactly as one of the enumeration's
/// members. There is no ordering constraint, so admins can correct mistakes
/// (`COMPLETED -> PENDING`, `PAID -> PENDING`), and re-applying the current
/// value is accepted.
pub struct StatusMachine;

impl StatusMachine {
    pub fn parse_fulfillment(requested: &str) -> Result<FulfillmentStatus, InvalidTransition> {
        FulfillmentStatus::from_str(requested).map_err(|_| InvalidTransition {
            field: StatusField::Fulfillment,
            requested: requested.to_string(),
        })
    }

    pub fn parse_payment(requested: &str) -> Result<PaymentStatus, InvalidTransition> {
        PaymentStatus::from_str(requested).map_err(|_| InvalidTransition {
            field: StatusField::Payment,
            requested: requested.to_string(),
        })
    }

    /// Check whether `requested` is an acceptable value for `field`
    pub fn is_valid_transition(field: StatusField, requested: &str) -> bool {
        match field {
            StatusField::Fulfillment => Self::parse_fulfillment(requested).is_ok(),
            StatusField::Payment => Self::parse_payment(requested).is_ok(),
        }
    }

    /// Apply a transition to an order
    ///
    /// Returns the updated order, or `InvalidTransition` with the input untouched.
    pub fn transition(
        order: &Order,
        field: StatusField,
        requested: &str,
    ) -> Result<Order, InvalidTransition> {
        let mut updated = order.clone();
        match field {
            StatusField::Fulfillment => updated.status = Self::parse_fulfillment(requested)?,
            StatusField::Payment => updated.payment_status = Self::parse_payment(requested)?,
        }
        Ok(updated)
    }
}



#[cfg(test)]
mod tests_support {
    use super::*;
    use crate::orders::{NewOrder, OrderSelection, PriceBreakdown};
    use rust_decimal::Decimal;

    pub fn order() -> Order {
        NewOrder {
            order_number: "PT-20240101-BBBBBB".to_string(),
            customer_name: "Mei".to_string(),
            phone: "+15550101".to_string(),
            email: None,
            address: None,
            selection: OrderSelection {
                style: "Sketch".to_string(),
                size: "A4".to_string(),
                number_of_faces: 1,
                frame_id: None,
                coupon_code: None,
            },
            reference_images: vec![],
            customer_notes: None,
            breakdown: PriceBreakdown {
                base_price: Decimal::from(1500),
                frame_price: Decimal::ZERO,
                discount_amount: Decimal::ZERO,
                final_price: Decimal::from(1500),
            },
            applied_offer_id: None,
        }
        .into_order(2, chrono::Utc::now())
    }
}
