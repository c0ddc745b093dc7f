// Promotion Selector
//
// Picks at most one offer for an order and computes its discount.
// Pipeline: active -> date window -> coupon gate -> eligibility -> priority -> discount.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::cmp::Ordering;

use crate::pricing::{
    models::Offer,
    types::{Money, OfferType, RejectionReason},
};

/// Inputs to a single promotion selection
#[derive(Debug, Clone)]
pub struct PromotionRequest<'a> {
    pub base_price: Money,
    /// Code typed by the customer, if any. Blank input counts as no code.
    pub coupon_code: Option<&'a str>,
    pub is_first_order: bool,
    pub style: &'a str,
    /// Instant the date windows are evaluated against
    pub now: DateTime<Utc>,
}

/// Result of promotion selection
///
/// `discount_amount` is always within `[0, base_price]`. When nothing applied,
/// `rejection_reason` explains why, if there is something to explain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionOutcome {
    pub discount_amount: Money,
    pub applied_offer_id: Option<i64>,
    pub applied_offer_type: Option<OfferType>,
    /// Set when a FREE_FRAME offer applied; order assembly charges no frame fee
    pub frame_fee_waived: bool,
    pub rejection_reason: Option<RejectionReason>,
}

impl PromotionOutcome {
    /// No offer applied and nothing to report
    pub fn no_discount() -> Self {
        Self {
            discount_amount: Decimal::ZERO,
            applied_offer_id: None,
            applied_offer_type: None,
            frame_fee_waived: false,
            rejection_reason: None,
        }
    }

    fn rejected(reason: RejectionReason) -> Self {
        Self {
            rejection_reason: Some(reason),
            ..Self::no_discount()
        }
    }

    fn applied(offer: &Offer, discount_amount: Money) -> Self {
        Self {
            discount_amount,
            applied_offer_id: Some(offer.id),
            applied_offer_type: Some(offer.offer_type),
            frame_fee_waived: offer.offer_type == OfferType::FreeFrame,
            rejection_reason: None,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.applied_offer_id.is_some()
    }
}

/// Promotion Selector
///
/// Stateless; every call is independent and safe to run concurrently.
pub struct PromotionSelector;

impl PromotionSelector {
    /// Select at most one offer for the request and compute its discount
    ///
    /// With a coupon code only the offer carrying exactly that code (case-sensitive)
    /// is considered, and its failure reason is reported. Without one, only
    /// auto-apply offers compete and the highest priority wins, lowest id on ties.
    pub fn select(request: &PromotionRequest<'_>, offers: &[Offer]) -> PromotionOutcome {
        let coupon_code = request
            .coupon_code
            .map(str::trim)
            .filter(|code| !code.is_empty());

        let outcome = match coupon_code {
            Some(code) => Self::select_by_coupon(request, code, offers),
            None => Self::select_automatic(request, offers),
        };

        tracing::trace!(
            "Promotion outcome for base {}: offer={:?} discount={} reason={:?}",
            request.base_price,
            outcome.applied_offer_id,
            outcome.discount_amount,
            outcome.rejection_reason
        );

        outcome
    }

    fn select_by_coupon(
        request: &PromotionRequest<'_>,
        code: &str,
        offers: &[Offer],
    ) -> PromotionOutcome {
        let candidate = Self::best_ranked(
            offers
                .iter()
                .filter(|offer| offer.is_active && offer.coupon_code.as_deref() == Some(code)),
        );

        let Some(offer) = candidate else {
            tracing::debug!("Coupon code '{}' matches no active offer", code);
            return PromotionOutcome::rejected(RejectionReason::UnknownCoupon);
        };

        let checked = offer.check_window(request.now).and_then(|_| {
            offer.check_eligibility(request.base_price, request.style, request.is_first_order)
        });

        match checked {
            Ok(()) => PromotionOutcome::applied(
                offer,
                Self::compute_discount(offer, request.base_price),
            ),
            Err(reason) => {
                tracing::debug!("Coupon code '{}' rejected: {}", code, reason);
                PromotionOutcome::rejected(reason)
            }
        }
    }

    fn select_automatic(request: &PromotionRequest<'_>, offers: &[Offer]) -> PromotionOutcome {
        let mut eligible = Vec::new();
        let mut ineligible = Vec::new();

        for offer in offers.iter().filter(|o| o.is_active && o.is_auto_apply()) {
            if offer.check_window(request.now).is_err() {
                continue;
            }
            match offer.check_eligibility(request.base_price, request.style, request.is_first_order)
            {
                Ok(()) => eligible.push(offer),
                Err(reason) => ineligible.push((offer, reason)),
            }
        }

        if let Some(offer) = Self::best_ranked(eligible) {
            return PromotionOutcome::applied(
                offer,
                Self::compute_discount(offer, request.base_price),
            );
        }

        ineligible
            .into_iter()
            .min_by(|(a, _), (b, _)| Self::rank(a, b))
            .map(|(_, reason)| PromotionOutcome::rejected(reason))
            .unwrap_or_else(PromotionOutcome::no_discount)
    }

    /// Discount granted by `offer` against `base_price`
    ///
    /// Rounded to cents first, then capped by `max_discount`, then clamped to
    /// `[0, base_price]` so a misconfigured offer can never produce a negative price.
    pub fn compute_discount(offer: &Offer, base_price: Money) -> Money {
        let raw = match offer.offer_type {
            OfferType::FlatDiscount => offer.value,
            OfferType::PercentageDiscount | OfferType::FirstOrderDiscount => base_price
                .checked_mul(offer.value)
                .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
                .unwrap_or(base_price),
            OfferType::FreeFrame => Decimal::ZERO,
        };

        let rounded = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let capped = match offer.max_discount {
            Some(cap) if offer.offer_type.is_percentage() => rounded.min(cap),
            _ => rounded,
        };

        capped.min(base_price).max(Decimal::ZERO)
    }

    /// Higher priority first, then lower id
    fn rank(a: &Offer, b: &Offer) -> Ordering {
        b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id))
    }

    fn best_ranked<'o>(offers: impl IntoIterator<Item = &'o Offer>) -> Option<&'o Offer> {
        offers.into_iter().min_by(|a, b| Self::rank(a, b))
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn offer_type_strategy() -> impl Strategy<Value = OfferType> {
        prop_oneof![
            Just(OfferType::FlatDiscount),
            Just(OfferType::PercentageDiscount),
            Just(OfferType::FreeFrame),
            Just(OfferType::FirstOrderDiscount),
        ]
    }

    fn cents(max: u32) -> impl Strategy<Value = Decimal> {
        (0u32..=max).prop_map(|c| Decimal::from(c) / Decimal::from(100))
    }

    prop_compose! {
        fn offer_strategy(id: i64)(
            offer_type in offer_type_strategy(),
            value in cents(50_000),
            max_discount in prop::option::of(cents(200_000)),
            coupon in prop::option::of(prop_oneof![Just("SAVE"), Just("WELCOME")]),
            is_active in any::<bool>(),
            priority in -5i32..=20,
            starts_in_days in prop::option::of(-10i64..=10),
            ends_in_days in prop::option::of(-10i64..=10),
            min_order_value in prop::option::of(cents(500_000)),
            styles in prop::collection::vec(
                prop_oneof![Just("Sketch"), Just("Oil Painting")],
                0..=2,
            ),
            first_order_only in any::<bool>(),
        ) -> Offer {
            let now = Utc::now();
            Offer {
                id,
                title: format!("Offer {}", id),
                offer_type,
                value,
                max_discount,
                coupon_code: coupon.map(str::to_string),
                is_active,
                priority,
                start_date: starts_in_days.map(|d| now + Duration::days(d)),
                end_date: ends_in_days.map(|d| now + Duration::days(d)),
                min_order_value,
                applicable_styles: styles.into_iter().map(str::to_string).collect(),
                first_order_only,
            }
        }
    }

    fn offers_strategy() -> impl Strategy<Value = Vec<Offer>> {
        prop::collection::vec(offer_strategy(0), 0..=8).prop_map(|offers| {
            offers
                .into_iter()
                .enumerate()
                .map(|(i, mut o)| {
                    o.id = i as i64 + 1;
                    o
                })
                .collect()
        })
    }

    proptest! {
        /// Discount is always within [0, base_price]
        #[test]
        fn prop_discount_is_bounded(
            offers in offers_strategy(),
            base_price in cents(1_000_000),
            coupon in prop::option::of(prop_oneof![Just("SAVE"), Just("WELCOME"), Just("save")]),
            is_first_order in any::<bool>(),
        ) {
            let request = PromotionRequest {
                base_price,
                coupon_code: coupon,
                is_first_order,
                style: "Sketch",
                now: Utc::now(),
            };
            let outcome = PromotionSelector::select(&request, &offers);
            prop_assert!(outcome.discount_amount >= Decimal::ZERO);
            prop_assert!(outcome.discount_amount <= base_price);
        }

        /// Percentage discounts never exceed the configured cap
        #[test]
        fn prop_percentage_respects_cap(
            value in cents(20_000),
            cap in cents(100_000),
            base_price in cents(1_000_000),
            first_order in any::<bool>(),
        ) {
            let offer = Offer {
                id: 1,
                title: "Capped".to_string(),
                offer_type: if first_order {
                    OfferType::FirstOrderDiscount
                } else {
                    OfferType::PercentageDiscount
                },
                value,
                max_discount: Some(cap),
                coupon_code: None,
                is_active: true,
                priority: 0,
                start_date: None,
                end_date: None,
                min_order_value: None,
                applicable_styles: vec![],
                first_order_only: false,
            };
            let discount = PromotionSelector::compute_discount(&offer, base_price);
            prop_assert!(discount <= cap);
        }

        /// Caps with sub-cent precision hold after rounding
        #[test]
        fn prop_fine_grained_cap_is_respected(
            value in cents(20_000),
            cap_millis in 0u32..=1_000_000,
            base_price in cents(1_000_000),
        ) {
            let cap = Decimal::from(cap_millis) / Decimal::from(1000);
            let offer = Offer {
                id: 1,
                title: "Capped".to_string(),
                offer_type: OfferType::PercentageDiscount,
                value,
                max_discount: Some(cap),
                coupon_code: None,
                is_active: true,
                priority: 0,
                start_date: None,
                end_date: None,
                min_order_value: None,
                applicable_styles: vec![],
                first_order_only: false,
            };
            let discount = PromotionSelector::compute_discount(&offer, base_price);
            prop_assert!(discount <= cap);
            prop_assert!(discount >= Decimal::ZERO);
            prop_assert!(discount <= base_price);
        }

        /// First-order offers are never applied to returning customers
        #[test]
        fn prop_first_order_gating(
            offers in offers_strategy(),
            base_price in cents(1_000_000),
            coupon in prop::option::of(prop_oneof![Just("SAVE"), Just("WELCOME")]),
        ) {
            let request = PromotionRequest {
                base_price,
                coupon_code: coupon,
                is_first_order: false,
                style: "Sketch",
                now: Utc::now(),
            };
            let outcome = PromotionSelector::select(&request, &offers);
            if let Some(id) = outcome.applied_offer_id {
                let applied = offers.iter().find(|o| o.id == id).unwrap();
                prop_assert!(!applied.first_order_only);
            }
        }

        /// Identical inputs give identical outcomes
        #[test]
        fn prop_selection_is_deterministic(
            offers in offers_strategy(),
            base_price in cents(1_000_000),
            coupon in prop::option::of(prop_oneof![Just("SAVE"), Just("WELCOME")]),
            is_first_order in any::<bool>(),
        ) {
            let request = PromotionRequest {
                base_price,
                coupon_code: coupon,
                is_first_order,
                style: "Oil Painting",
                now: Utc::now(),
            };
            let first = PromotionSelector::select(&request, &offers);
            let second = PromotionSelector::select(&request, &offers);
            prop_assert_eq!(first, second);
        }

        /// An applied coupon offer always carries exactly the requested code
        #[test]
        fn prop_coupon_exactness(
            offers in offers_strategy(),
            base_price in cents(1_000_000),
            code in prop_oneof![Just("SAVE"), Just("WELCOME"), Just("Save"), Just("welcome")],
        ) {
            let request = PromotionRequest {
                base_price,
                coupon_code: Some(code),
                is_first_order: true,
                style: "Sketch",
                now: Utc::now(),
            };
            let outcome = PromotionSelector::select(&request, &offers);
            if let Some(id) = outcome.applied_offer_id {
                let applied = offers.iter().find(|o| o.id == id).unwrap();
                prop_assert_eq!(applied.coupon_code.as_deref(), Some(code));
            }
        }
    }
}
