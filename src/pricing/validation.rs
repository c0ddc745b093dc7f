// Domain validation for admin-authored catalog entries
//
// Field-level checks (blank strings, lengths) live on the request DTOs via
// `validator`; the rules here span several fields or depend on the offer type.

use rust_decimal::Decimal;

use crate::pricing::models::{NewOffer, NewPricingRule};

/// Money columns are stored as NUMERIC(12, 2)
const MONEY_SCALE: u32 = 2;

/// Reject amounts the database would silently round
fn check_cents(field: &str, amount: Decimal) -> Result<(), String> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(format!(
            "{} must have at most {} decimal places",
            field, MONEY_SCALE
        ));
    }
    Ok(())
}

/// Validates offers and pricing rules before they reach the catalog
pub struct OfferValidator;

impl OfferValidator {
    /// Check value ranges and the date window of an offer
    ///
    /// Returns a human-readable message for the first rule that fails.
    pub fn validate_offer(offer: &NewOffer) -> Result<(), String> {
        if offer.value < Decimal::ZERO {
            return Err("Offer value must be non-negative".to_string());
        }
        check_cents("value", offer.value)?;

        if offer.offer_type.is_percentage() && offer.value > Decimal::ONE_HUNDRED {
            return Err(format!("{} value cannot exceed 100%", offer.offer_type));
        }

        if let Some(cap) = offer.max_discount {
            if cap < Decimal::ZERO {
                return Err("max_discount must be non-negative".to_string());
            }
            check_cents("max_discount", cap)?;
        }

        if let Some(minimum) = offer.min_order_value {
            if minimum < Decimal::ZERO {
                return Err("min_order_value must be non-negative".to_string());
            }
            check_cents("min_order_value", minimum)?;
        }

        if let (Some(start), Some(end)) = (offer.start_date, offer.end_date) {
            if start > end {
                return Err("start_date must not be after end_date".to_string());
            }
        }

        if offer.applicable_styles.iter().any(|s| s.trim().is_empty()) {
            return Err("applicable_styles must not contain blank entries".to_string());
        }

        Ok(())
    }

    pub fn validate_pricing_rule(rule: &NewPricingRule) -> Result<(), String> {
        if rule.base_price < Decimal::ZERO {
            return Err("base_price must be non-negative".to_string());
        }
        check_cents("base_price", rule.base_price)
    }
}
