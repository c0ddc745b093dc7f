// In-memory catalog
//
// Same contract as the Postgres repository, kept in process. Used by tests and
// for running the service without a database.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{
    error::{CatalogError, CatalogResult},
    store::{OfferCatalog, PricingCatalog},
};
use crate::pricing::models::{FrameOption, NewOffer, NewPricingRule, Offer, PricingRule};

#[derive(Debug, Default)]
struct CatalogData {
    rules: Vec<PricingRule>,
    frames: Vec<FrameOption>,
    offers: Vec<Offer>,
    next_rule_id: i64,
    next_offer_id: i64,
}

impl CatalogData {
    fn rule_key_taken(&self, rule: &NewPricingRule, exclude_id: Option<i64>) -> bool {
        rule.is_active
            && self.rules.iter().any(|r| {
                r.is_active
                    && Some(r.id) != exclude_id
                    && r.matches(&rule.style, &rule.size, rule.number_of_faces)
            })
    }

    fn coupon_taken(&self, code: &str, exclude_id: Option<i64>) -> bool {
        self.offers
            .iter()
            .any(|o| Some(o.id) != exclude_id && o.coupon_code.as_deref() == Some(code))
    }
}

/// Catalog held in memory behind an async `RwLock`
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    data: RwLock<CatalogData>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stored rules as-is, keeping their ids
    pub fn with_rules(self, rules: Vec<PricingRule>) -> Self {
        let mut data = self.data.into_inner();
        data.next_rule_id = rules.iter().map(|r| r.id).max().unwrap_or(0).max(data.next_rule_id);
        data.rules.extend(rules);
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn with_frames(self, frames: Vec<FrameOption>) -> Self {
        let mut data = self.data.into_inner();
        data.frames.extend(frames);
        Self {
            data: RwLock::new(data),
        }
    }

    /// Seed stored offers as-is, keeping their ids
    pub fn with_offers(self, offers: Vec<Offer>) -> Self {
        let mut data = self.data.into_inner();
        data.next_offer_id = offers.iter().map(|o| o.id).max().unwrap_or(0).max(data.next_offer_id);
        data.offers.extend(offers);
        Self {
            data: RwLock::new(data),
        }
    }
}

fn duplicate_rule(rule: &NewPricingRule) -> CatalogError {
    CatalogError::DuplicatePricingRule {
        style: rule.style.clone(),
        size: rule.size.clone(),
        number_of_faces: rule.number_of_faces,
    }
}

#[async_trait]
impl PricingCatalog for InMemoryCatalog {
    async fn active_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        let data = self.data.read().await;
        Ok(data.rules.iter().filter(|r| r.is_active).cloned().collect())
    }

    async fn list_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        Ok(self.data.read().await.rules.clone())
    }

    async fn create_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        let mut data = self.data.write().await;
        if data.rule_key_taken(&rule, None) {
            return Err(duplicate_rule(&rule));
        }

        data.next_rule_id += 1;
        let created = rule.into_rule(data.next_rule_id);
        data.rules.push(created.clone());
        Ok(created)
    }

    async fn update_rule(&self, id: i64, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        let mut data = self.data.write().await;
        if data.rule_key_taken(&rule, Some(id)) {
            return Err(duplicate_rule(&rule));
        }

        let slot = data
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CatalogError::rule_not_found(id))?;
        *slot = rule.into_rule(id);
        Ok(slot.clone())
    }

    async fn active_frames(&self) -> CatalogResult<Vec<FrameOption>> {
        let data = self.data.read().await;
        Ok(data.frames.iter().filter(|f| f.is_active).cloned().collect())
    }
}

#[async_trait]
impl OfferCatalog for InMemoryCatalog {
    async fn active_offers(&self) -> CatalogResult<Vec<Offer>> {
        let data = self.data.read().await;
        Ok(data.offers.iter().filter(|o| o.is_active).cloned().collect())
    }

    async fn list_offers(&self) -> CatalogResult<Vec<Offer>> {
        Ok(self.data.read().await.offers.clone())
    }

    async fn find_offer(&self, id: i64) -> CatalogResult<Option<Offer>> {
        let data = self.data.read().await;
        Ok(data.offers.iter().find(|o| o.id == id).cloned())
    }

    async fn create_offer(&self, offer: NewOffer) -> CatalogResult<Offer> {
        let mut data = self.data.write().await;
        if let Some(code) = offer.coupon_code.as_deref() {
            if data.coupon_taken(code, None) {
                return Err(CatalogError::DuplicateCoupon(code.to_string()));
            }
        }

        data.next_offer_id += 1;
        let created = offer.into_offer(data.next_offer_id);
        data.offers.push(created.clone());
        Ok(created)
    }

    async fn update_offer(&self, id: i64, offer: NewOffer) -> CatalogResult<Offer> {
        let mut data = self.data.write().await;
        if let Some(code) = offer.coupon_code.as_deref() {
            if data.coupon_taken(code, Some(id)) {
                return Err(CatalogError::DuplicateCoupon(code.to_string()));
            }
        }

        let slot = data
            .offers
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| CatalogError::offer_not_found(id))?;
        *slot = offer.into_offer(id);
        Ok(slot.clone())
    }

    async fn delete_offer(&self, id: i64) -> CatalogResult<()> {
        let mut data = self.data.write().await;
        let before = data.offers.len();
        data.offers.retain(|o| o.id != id);
        if data.offers.len() == before {
            return Err(CatalogError::offer_not_found(id));
        }
        Ok(())
    }
}
