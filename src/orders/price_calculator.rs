use rust_decimal::Decimal;

use crate::orders::PriceBreakdown;
use crate::pricing::{Money, PromotionOutcome};

/// Assembles the itemised price of an order
pub struct PriceCalculator;

impl PriceCalculator {
    /// Frame fee actually charged, honouring a FREE_FRAME promotion
    pub fn frame_fee(frame_price: Option<Money>, promotion: &PromotionOutcome) -> Money {
        match frame_price {
            Some(_) if promotion.frame_fee_waived => Decimal::ZERO,
            Some(price) => price.max(Decimal::ZERO),
            None => Decimal::ZERO,
        }
    }

    /// Final price: `max(0, base + frame - discount)`
    pub fn calculate_final(base_price: Money, frame_price: Money, discount_amount: Money) -> Money {
        (base_price + frame_price - discount_amount).max(Decimal::ZERO)
    }

    /// Build the breakdown for a resolved base price, optional frame and promotion
    pub fn assemble(
        base_price: Money,
        frame_price: Option<Money>,
        promotion: &PromotionOutcome,
    ) -> PriceBreakdown {
        let frame_price = Self::frame_fee(frame_price, promotion);
        PriceBreakdown {
            base_price,
            frame_price,
            discount_amount: promotion.discount_amount,
            final_price: Self::calculate_final(base_price, frame_price, promotion.discount_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::OfferType;
    use rust_decimal_macros::dec;

    fn discount(amount: Money) -> PromotionOutcome {
        PromotionOutcome {
            discount_amount: amount,
            applied_offer_id: Some(1),
            applied_offer_type: Some(OfferType::FlatDiscount),
            frame_fee_waived: false,
            rejection_reason: None,
        }
    }

    #[test]
    fn test_flat_coupon_breakdown() {
        let breakdown = PriceCalculator::assemble(dec!(3000), None, &discount(dec!(500)));
        assert_eq!(breakdown.frame_price, dec!(0));
        assert_eq!(breakdown.final_price, dec!(2500));
    }

    #[test]
    fn test_frame_is_added() {
        let breakdown = PriceCalculator::assemble(
            dec!(3000),
            Some(dec!(650)),
            &PromotionOutcome::no_discount(),
        );
        assert_eq!(breakdown.frame_price, dec!(650));
        assert_eq!(breakdown.final_price, dec!(3650));
    }

    #[test]
    fn test_free_frame_waives_fee() {
        let promotion = PromotionOutcome {
            discount_amount: dec!(0),
            applied_offer_id: Some(4),
            applied_offer_type: Some(OfferType::FreeFrame),
            frame_fee_waived: true,
            rejection_reason: None,
        };
        let breakdown = PriceCalculator::assemble(dec!(3000), Some(dec!(650)), &promotion);
        assert_eq!(breakdown.frame_price, dec!(0));
        assert_eq!(breakdown.final_price, dec!(3000));
    }

    #[test]
    fn test_final_never_negative() {
        assert_eq!(PriceCalculator::calculate_final(dec!(100), dec!(0), dec!(250)), dec!(0));
    }

    #[test]
    fn test_discount_does_not_eat_frame_beyond_base() {
        // Discount is bounded by base, so the frame fee always survives
        let breakdown =
            PriceCalculator::assemble(dec!(1000), Some(dec!(450)), &discount(dec!(1000)));
        assert_eq!(breakdown.final_price, dec!(450));
    }
}
