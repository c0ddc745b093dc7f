// Price Resolver
//
// Looks up the base price for a (style, size, face count) selection against a
// snapshot of active pricing rules.

use crate::pricing::{
    error::{PricingError, PricingResult},
    models::PricingRule,
    types::Money,
};

/// Resolves base prices from the pricing catalog
pub struct PriceResolver;

impl PriceResolver {
    /// Resolve the base price of a selection
    ///
    /// The lookup is an exact, case-sensitive match on the natural key and only
    /// considers active rules. Storefront choices come from catalog dropdowns, so
    /// there is no nearest-match fallback.
    ///
    /// # Errors
    /// * `InvalidInput` - blank style or size, or fewer than one face
    /// * `PricingNotFound` - no active rule for the combination
    pub fn resolve(
        style: &str,
        size: &str,
        number_of_faces: i32,
        rules: &[PricingRule],
    ) -> PricingResult<Money> {
        Self::validate_selection(style, size, number_of_faces)?;

        rules
            .iter()
            .find(|rule| rule.is_active && rule.matches(style, size, number_of_faces))
            .map(|rule| rule.base_price)
            .ok_or_else(|| {
                tracing::debug!(
                    "No active pricing rule for {} / {} / {} face(s)",
                    style,
                    size,
                    number_of_faces
                );
                PricingError::PricingNotFound {
                    style: style.to_string(),
                    size: size.to_string(),
                    number_of_faces,
                }
            })
    }

    fn validate_selection(style: &str, size: &str, number_of_faces: i32) -> PricingResult<()> {
        if style.trim().is_empty() {
            return Err(PricingError::InvalidInput("style must not be blank".to_string()));
        }
        if size.trim().is_empty() {
            return Err(PricingError::InvalidInput("size must not be blank".to_string()));
        }
        if number_of_faces < 1 {
            return Err(PricingError::InvalidInput(format!(
                "number_of_faces must be at least 1, got {}",
                number_of_faces
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rule(
        id: i64,
        style: &str,
        size: &str,
        faces: i32,
        price: Money,
        active: bool,
    ) -> PricingRule {
        PricingRule {
            id,
            style: style.to_string(),
            size: size.to_string(),
            number_of_faces: faces,
            base_price: price,
            is_active: active,
        }
    }

    fn catalog() -> Vec<PricingRule> {
        vec![
            rule(1, "Pencil Sketch", "A4", 1, dec!(1500), true),
            rule(2, "Pencil Sketch", "A4", 2, dec!(2200), true),
            rule(3, "Oil Painting", "A3", 1, dec!(3000), true),
            rule(4, "Oil Painting", "A1", 1, dec!(9000), false),
        ]
    }

    #[test]
    fn test_resolve_exact_match() {
        let price = PriceResolver::resolve("Pencil Sketch", "A4", 2, &catalog()).unwrap();
        assert_eq!(price, dec!(2200));
    }

    #[test]
    fn test_missing_rule_is_pricing_not_found() {
        let result = PriceResolver::resolve("Oil Painting", "A1", 1, &catalog());
        assert_eq!(
            result,
            Err(PricingError::PricingNotFound {
                style: "Oil Painting".to_string(),
                size: "A1".to_string(),
                number_of_faces: 1,
            })
        );
    }

    #[test]
    fn test_inactive_rule_is_not_selectable() {
        let rules = vec![rule(4, "Oil Painting", "A1", 1, dec!(9000), false)];
        assert!(matches!(
            PriceResolver::resolve("Oil Painting", "A1", 1, &rules),
            Err(PricingError::PricingNotFound { .. })
        ));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(PriceResolver::resolve("pencil sketch", "A4", 1, &catalog()).is_err());
        assert!(PriceResolver::resolve("Pencil Sketch", "a4", 1, &catalog()).is_err());
    }

    #[test]
    fn test_face_count_must_match() {
        assert!(PriceResolver::resolve("Pencil Sketch", "A4", 3, &catalog()).is_err());
    }

    #[test]
    fn test_invalid_selection_is_rejected_before_lookup() {
        assert!(matches!(
            PriceResolver::resolve("Pencil Sketch", "A4", 0, &catalog()),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            PriceResolver::resolve("  ", "A4", 1, &catalog()),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            PriceResolver::resolve("Pencil Sketch", "", 1, &catalog()),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(matches!(
            PriceResolver::resolve("Pencil Sketch", "A4", 1, &[]),
            Err(PricingError::PricingNotFound { .. })
        ));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn rules_strategy() -> impl Strategy<Value = Vec<PricingRule>> {
        prop::collection::vec(
            (
                prop_oneof![Just("Sketch"), Just("Oil Painting"), Just("Charcoal")],
                prop_oneof![Just("A4"), Just("A3"), Just("A2")],
                1i32..=4,
                0u32..=1_000_000u32,
                any::<bool>(),
            ),
            0..=20,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (style, size, faces, cents, active))| PricingRule {
                    id: i as i64 + 1,
                    style: style.to_string(),
                    size: size.to_string(),
                    number_of_faces: faces,
                    base_price: Decimal::from(cents) / Decimal::from(100),
                    is_active: active,
                })
                .collect()
        })
    }

    proptest! {
        /// Resolution is a pure function of its inputs
        #[test]
        fn prop_resolve_is_deterministic(
            rules in rules_strategy(),
            style in prop_oneof![Just("Sketch"), Just("Oil Painting"), Just("Charcoal")],
            size in prop_oneof![Just("A4"), Just("A3"), Just("A2")],
            faces in 1i32..=4,
        ) {
            let first = PriceResolver::resolve(style, size, faces, &rules);
            let second = PriceResolver::resolve(style, size, faces, &rules);
            prop_assert_eq!(first, second);
        }

        /// A resolved price always comes from an active rule with that exact key
        #[test]
        fn prop_resolved_price_comes_from_active_rule(
            rules in rules_strategy(),
            faces in 1i32..=4,
        ) {
            if let Ok(price) = PriceResolver::resolve("Sketch", "A4", faces, &rules) {
                prop_assert!(rules.iter().any(|r| r.is_active
                    && r.matches("Sketch", "A4", faces)
                    && r.base_price == price));
            } else {
                let any_match = rules
                    .iter()
                    .any(|r| r.is_active && r.matches("Sketch", "A4", faces));
                prop_assert!(!any_match);
            }
        }
    }
}
