// Domain type definitions for the pricing core
// Shared by the resolver, the promotion selector and the order lifecycle

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount in the storefront currency.
///
/// Currency conversion does not exist in this system, so money is a plain decimal.
pub type Money = Decimal;

/// Kind of discount an offer grants
///
/// Determines how `Offer::value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferType {
    /// `value` is a currency amount taken off the base price
    FlatDiscount,

    /// `value` is a percentage of the base price (e.g. 20 = 20% off)
    PercentageDiscount,

    /// Waives the frame add-on fee; never discounts the base price
    FreeFrame,

    /// Percentage discount intended for first-time customers
    FirstOrderDiscount,
}

impl OfferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::FlatDiscount => "FLAT_DISCOUNT",
            OfferType::PercentageDiscount => "PERCENTAGE_DISCOUNT",
            OfferType::FreeFrame => "FREE_FRAME",
            OfferType::FirstOrderDiscount => "FIRST_ORDER_DISCOUNT",
        }
    }

    /// Whether `value` is read as a percentage of the base price
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            OfferType::PercentageDiscount | OfferType::FirstOrderDiscount
        )
    }
}

impl fmt::Display for OfferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OfferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FLAT_DISCOUNT" => Ok(OfferType::FlatDiscount),
            "PERCENTAGE_DISCOUNT" => Ok(OfferType::PercentageDiscount),
            "FREE_FRAME" => Ok(OfferType::FreeFrame),
            "FIRST_ORDER_DISCOUNT" => Ok(OfferType::FirstOrderDiscount),
            _ => Err(format!("Invalid offer type: {}", s)),
        }
    }
}

/// Why a requested or candidate offer was not applied
///
/// Returned alongside a zero discount so callers can tell an unknown code apart
/// from a valid code whose conditions were not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    /// No active offer carries the supplied coupon code
    UnknownCoupon,

    /// The offer's start date is still in the future
    NotYetActive,

    /// The offer's end date has passed
    Expired,

    /// The base price is below the offer's minimum order value
    BelowMinimumOrder,

    /// The offer is restricted to other styles
    StyleNotApplicable,

    /// The offer is for first orders and the customer has ordered before
    NotFirstOrder,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::UnknownCoupon => "UNKNOWN_COUPON",
            RejectionReason::NotYetActive => "NOT_YET_ACTIVE",
            RejectionReason::Expired => "EXPIRED",
            RejectionReason::BelowMinimumOrder => "BELOW_MINIMUM_ORDER",
            RejectionReason::StyleNotApplicable => "STYLE_NOT_APPLICABLE",
            RejectionReason::NotFirstOrder => "NOT_FIRST_ORDER",
        }
    }

    /// True when the code itself was not recognised, as opposed to a known
    /// offer whose conditions failed
    pub fn is_unknown_code(&self) -> bool {
        matches!(self, RejectionReason::UnknownCoupon)
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectionReason::UnknownCoupon => "coupon code not recognised",
            RejectionReason::NotYetActive => "offer has not started yet",
            RejectionReason::Expired => "offer has expired",
            RejectionReason::BelowMinimumOrder => "order value is below the offer minimum",
            RejectionReason::StyleNotApplicable => "offer does not apply to this style",
            RejectionReason::NotFirstOrder => "offer is only valid on a first order",
        };
        write!(f, "{}", text)
    }
}
