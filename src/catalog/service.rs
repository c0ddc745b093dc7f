// Catalog maintenance service
//
// Validates admin writes before they reach the store; reads pass through.

use std::sync::Arc;
use validator::Validate;

use crate::catalog::{
    error::{CatalogError, CatalogResult},
    store::{OfferCatalog, PricingCatalog},
};
use crate::pricing::{
    models::{FrameOption, NewOffer, NewPricingRule, Offer, PricingRule},
    validation::OfferValidator,
};

#[derive(Clone)]
pub struct CatalogService {
    pricing: Arc<dyn PricingCatalog>,
    offers: Arc<dyn OfferCatalog>,
}

impl CatalogService {
    pub fn new(pricing: Arc<dyn PricingCatalog>, offers: Arc<dyn OfferCatalog>) -> Self {
        Self { pricing, offers }
    }

    pub async fn active_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        self.pricing.active_rules().await
    }

    pub async fn list_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        self.pricing.list_rules().await
    }

    pub async fn active_frames(&self) -> CatalogResult<Vec<FrameOption>> {
        self.pricing.active_frames().await
    }

    pub async fn create_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        let rule = Self::checked_rule(rule)?;
        let created = self.pricing.create_rule(rule).await?;
        tracing::info!(
            "Created pricing rule {} for {} / {} / {}",
            created.id,
            created.style,
            created.size,
            created.number_of_faces
        );
        Ok(created)
    }

    pub async fn update_rule(&self, id: i64, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        let rule = Self::checked_rule(rule)?;
        let updated = self.pricing.update_rule(id, rule).await?;
        tracing::info!("Updated pricing rule {}", id);
        Ok(updated)
    }

    pub async fn list_offers(&self) -> CatalogResult<Vec<Offer>> {
        self.offers.list_offers().await
    }

    pub async fn get_offer(&self, id: i64) -> CatalogResult<Offer> {
        self.offers
            .find_offer(id)
            .await?
            .ok_or_else(|| CatalogError::offer_not_found(id))
    }

    pub async fn create_offer(&self, offer: NewOffer) -> CatalogResult<Offer> {
        let offer = Self::checked_offer(offer)?;
        self.offers.create_offer(offer).await
    }

    pub async fn update_offer(&self, id: i64, offer: NewOffer) -> CatalogResult<Offer> {
        let offer = Self::checked_offer(offer)?;
        let updated = self.offers.update_offer(id, offer).await?;
        tracing::info!("Updated offer {}", id);
        Ok(updated)
    }

    pub async fn delete_offer(&self, id: i64) -> CatalogResult<()> {
        self.offers.delete_offer(id).await
    }

    /// Trim text fields, then run field and domain validation
    fn checked_offer(mut offer: NewOffer) -> CatalogResult<NewOffer> {
        offer.title = offer.title.trim().to_string();
        offer.coupon_code = offer.coupon_code.map(|code| code.trim().to_string());
        offer.applicable_styles = offer
            .applicable_styles
            .into_iter()
            .map(|style| style.trim().to_string())
            .collect();

        offer.validate()?;
        OfferValidator::validate_offer(&offer).map_err(|reason| {
            tracing::warn!("Rejected offer '{}': {}", offer.title, reason);
            CatalogError::InvalidOffer(reason)
        })?;
        Ok(offer)
    }

    fn checked_rule(mut rule: NewPricingRule) -> CatalogResult<NewPricingRule> {
        rule.style = rule.style.trim().to_string();
        rule.size = rule.size.trim().to_string();

        rule.validate()?;
        OfferValidator::validate_pricing_rule(&rule)
            .map_err(CatalogError::InvalidPricingRule)?;
        Ok(rule)
    }
}
