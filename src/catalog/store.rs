// Catalog store abstractions
//
// The pricing core only ever sees snapshots; these traits are where the
// snapshots come from. Postgres backs them in production, an in-memory store
// backs them in tests, and `CachedCatalog` can wrap either.

use async_trait::async_trait;

use crate::catalog::error::CatalogResult;
use crate::pricing::models::{FrameOption, NewOffer, NewPricingRule, Offer, PricingRule};

/// Source of pricing rules and frame add-ons
#[async_trait]
pub trait PricingCatalog: Send + Sync {
    /// Snapshot of every active pricing rule
    async fn active_rules(&self) -> CatalogResult<Vec<PricingRule>>;

    /// All rules including deactivated ones, for the admin view
    async fn list_rules(&self) -> CatalogResult<Vec<PricingRule>>;

    /// Insert a rule; fails with `DuplicatePricingRule` when an active rule
    /// already exists for the same natural key
    async fn create_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule>;

    /// Replace a rule in place
    async fn update_rule(&self, id: i64, rule: NewPricingRule) -> CatalogResult<PricingRule>;

    /// Snapshot of every active frame add-on
    async fn active_frames(&self) -> CatalogResult<Vec<FrameOption>>;
}

/// Source of promotional offers
///
/// Owns coupon uniqueness: no two offers may share a coupon code.
#[async_trait]
pub trait OfferCatalog: Send + Sync {
    /// Snapshot of every active offer, regardless of date window
    async fn active_offers(&self) -> CatalogResult<Vec<Offer>>;

    async fn list_offers(&self) -> CatalogResult<Vec<Offer>>;

    async fn find_offer(&self, id: i64) -> CatalogResult<Option<Offer>>;

    /// Insert an offer; fails with `DuplicateCoupon` when the code is taken
    async fn create_offer(&self, offer: NewOffer) -> CatalogResult<Offer>;

    /// Replace an offer; its own coupon code does not count as a duplicate
    async fn update_offer(&self, id: i64, offer: NewOffer) -> CatalogResult<Offer>;

    async fn delete_offer(&self, id: i64) -> CatalogResult<()>;
}
