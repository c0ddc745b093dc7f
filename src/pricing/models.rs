// Catalog records consumed by the pricing core
//
// These are plain data: the resolver and selector read them, the catalog
// stores them. Nothing in the pricing core mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::pricing::types::{Money, OfferType, RejectionReason};

/// Base price for one orderable (style, size, face count) combination
///
/// `(style, size, number_of_faces)` is the natural key; at most one active rule
/// exists per key. Deactivated rules stay in the table for historical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PricingRule {
    pub id: i64,
    pub style: String,
    pub size: String,
    pub number_of_faces: i32,
    pub base_price: Money,
    pub is_active: bool,
}

impl PricingRule {
    /// Exact, case-sensitive natural-key match
    pub fn matches(&self, style: &str, size: &str, number_of_faces: i32) -> bool {
        self.style == style && self.size == size && self.number_of_faces == number_of_faces
    }
}

/// Optional frame add-on charged on top of the base price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FrameOption {
    pub id: i64,
    pub name: String,
    pub price: Money,
    pub is_active: bool,
}

/// Discount policy, optionally gated by a coupon code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Offer {
    pub id: i64,
    pub title: String,
    pub offer_type: OfferType,
    pub value: Money,
    pub max_discount: Option<Money>,
    pub coupon_code: Option<String>,
    pub is_active: bool,
    pub priority: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_order_value: Option<Money>,
    pub applicable_styles: Vec<String>,
    pub first_order_only: bool,
}

impl Offer {
    /// Offers without a coupon code are applied automatically
    pub fn is_auto_apply(&self) -> bool {
        self.coupon_code.is_none()
    }

    /// Check the inclusive `[start_date, end_date]` window against `now`
    pub fn check_window(&self, now: DateTime<Utc>) -> Result<(), RejectionReason> {
        if let Some(start) = self.start_date {
            if now < start {
                return Err(RejectionReason::NotYetActive);
            }
        }
        if let Some(end) = self.end_date {
            if now > end {
                return Err(RejectionReason::Expired);
            }
        }
        Ok(())
    }

    /// Check minimum order value, style restriction and first-order gating,
    /// in that order
    pub fn check_eligibility(
        &self,
        base_price: Money,
        style: &str,
        is_first_order: bool,
    ) -> Result<(), RejectionReason> {
        if let Some(minimum) = self.min_order_value {
            if base_price < minimum {
                return Err(RejectionReason::BelowMinimumOrder);
            }
        }

        if !self.applicable_styles.is_empty()
            && !self.applicable_styles.iter().any(|s| s == style)
        {
            return Err(RejectionReason::StyleNotApplicable);
        }

        if self.first_order_only && !is_first_order {
            return Err(RejectionReason::NotFirstOrder);
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// Admin payload for creating or replacing a pricing rule
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPricingRule {
    #[validate(custom = "crate::validation::validate_not_blank", length(max = 100))]
    pub style: String,
    #[validate(custom = "crate::validation::validate_not_blank", length(max = 50))]
    pub size: String,
    #[validate(range(min = 1, max = 50, message = "number_of_faces must be between 1 and 50"))]
    pub number_of_faces: i32,
    pub base_price: Money,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Admin payload for creating or replacing an offer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOffer {
    #[validate(custom = "crate::validation::validate_not_blank", length(max = 120))]
    pub title: String,
    pub offer_type: OfferType,
    pub value: Money,
    pub max_discount: Option<Money>,
    #[validate(custom = "crate::validation::validate_coupon_code")]
    pub coupon_code: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_order_value: Option<Money>,
    #[serde(default)]
    pub applicable_styles: Vec<String>,
    #[serde(default)]
    pub first_order_only: bool,
}

impl NewOffer {
    /// Materialise the payload as a stored offer with the given id
    pub fn into_offer(self, id: i64) -> Offer {
        Offer {
            id,
            title: self.title,
            offer_type: self.offer_type,
            value: self.value,
            max_discount: self.max_discount,
            coupon_code: self.coupon_code,
            is_active: self.is_active,
            priority: self.priority,
            start_date: self.start_date,
            end_date: self.end_date,
            min_order_value: self.min_order_value,
            applicable_styles: self.applicable_styles,
            first_order_only: self.first_order_only,
        }
    }
}

impl NewPricingRule {
    pub fn into_rule(self, id: i64) -> PricingRule {
        PricingRule {
            id,
            style: self.style,
            size: self.size,
            number_of_faces: self.number_of_faces,
            base_price: self.base_price,
            is_active: self.is_active,
        }
    }
}
