// Catalog cache
//
// Wraps any catalog and keeps the active snapshots (rules, offers, frames) in
// memory for a short TTL. Every write made through the wrapper invalidates the
// cached snapshots so admins see their changes on the next read.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::catalog::{
    error::CatalogResult,
    store::{OfferCatalog, PricingCatalog},
};
use crate::pricing::models::{FrameOption, NewOffer, NewPricingRule, Offer, PricingRule};

/// Default time-to-live for cached snapshots
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Snapshot<T> {
    items: Vec<T>,
    loaded_at: Option<Instant>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded_at: None,
        }
    }
}

impl<T: Clone> Snapshot<T> {
    fn is_stale(&self, ttl: Duration) -> bool {
        match self.loaded_at {
            Some(loaded_at) => loaded_at.elapsed() > ttl,
            None => true,
        }
    }

    fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded_at = Some(Instant::now());
    }

    fn invalidate(&mut self) {
        self.loaded_at = None;
    }
}

#[derive(Debug, Default)]
struct CatalogCache {
    rules: Snapshot<PricingRule>,
    offers: Snapshot<Offer>,
    frames: Snapshot<FrameOption>,
}

/// Read-through cache in front of a catalog store
pub struct CachedCatalog<C> {
    inner: C,
    cache: RwLock<CatalogCache>,
    ttl: Duration,
}

impl<C> CachedCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            cache: RwLock::new(CatalogCache::default()),
            ttl,
        }
    }

    /// The wrapped store, bypassing the cache
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop every cached snapshot; the next read goes to the store
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.rules.invalidate();
        cache.offers.invalidate();
        cache.frames.invalidate();
        tracing::debug!("Catalog cache invalidated");
    }
}

/// Double-checked read-through: fast path under the read lock, reload under
/// the write lock only if the snapshot is still stale once we hold it
macro_rules! cached_snapshot {
    ($self:ident, $field:ident, $load:expr) => {{
        {
            let cache = $self.cache.read().await;
            if !cache.$field.is_stale($self.ttl) {
                return Ok(cache.$field.items.clone());
            }
        }

        let mut cache = $self.cache.write().await;
        if !cache.$field.is_stale($self.ttl) {
            return Ok(cache.$field.items.clone());
        }

        tracing::debug!("Reloading cached {}", stringify!($field));
        let items = $load.await?;
        cache.$field.replace(items.clone());
        Ok(items)
    }};
}

#[async_trait]
impl<C: PricingCatalog> PricingCatalog for CachedCatalog<C> {
    async fn active_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        cached_snapshot!(self, rules, self.inner.active_rules())
    }

    async fn list_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        self.inner.list_rules().await
    }

    async fn create_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        let created = self.inner.create_rule(rule).await?;
        self.invalidate().await;
        Ok(created)
    }

    async fn update_rule(&self, id: i64, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        let updated = self.inner.update_rule(id, rule).await?;
        self.invalidate().await;
        Ok(updated)
    }

    async fn active_frames(&self) -> CatalogResult<Vec<FrameOption>> {
        cached_snapshot!(self, frames, self.inner.active_frames())
    }
}

#[async_trait]
impl<C: OfferCatalog> OfferCatalog for CachedCatalog<C> {
    async fn active_offers(&self) -> CatalogResult<Vec<Offer>> {
        cached_snapshot!(self, offers, self.inner.active_offers())
    }

    async fn list_offers(&self) -> CatalogResult<Vec<Offer>> {
        self.inner.list_offers().await
    }

    async fn find_offer(&self, id: i64) -> CatalogResult<Option<Offer>> {
        self.inner.find_offer(id).await
    }

    async fn create_offer(&self, offer: NewOffer) -> CatalogResult<Offer> {
        let created = self.inner.create_offer(offer).await?;
        self.invalidate().await;
        Ok(created)
    }

    async fn update_offer(&self, id: i64, offer: NewOffer) -> CatalogResult<Offer> {
        let updated = self.inner.update_offer(id, offer).await?;
        self.invalidate().await;
        Ok(updated)
    }

    async fn delete_offer(&self, id: i64) -> CatalogResult<()> {
        self.inner.delete_offer(id).await?;
        self.invalidate().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::InMemoryCatalog;
    use crate::pricing::types::OfferType;
    use rust_decimal_macros::dec;

    fn new_offer(title: &str) -> NewOffer {
        NewOffer {
            title: title.to_string(),
            offer_type: OfferType::FlatDiscount,
            value: dec!(100),
            max_discount: None,
            coupon_code: None,
            is_active: true,
            priority: 0,
            start_date: None,
            end_date: None,
            min_order_value: None,
            applicable_styles: vec![],
            first_order_only: false,
        }
    }

    #[test]
    fn test_snapshot_staleness() {
        let mut snapshot: Snapshot<i32> = Snapshot::default();
        assert!(snapshot.is_stale(Duration::from_secs(60)));

        snapshot.replace(vec![1, 2]);
        assert!(!snapshot.is_stale(Duration::from_secs(60)));

        snapshot.invalidate();
        assert!(snapshot.is_stale(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_reads_are_served_from_cache() {
        let cached = CachedCatalog::with_ttl(InMemoryCatalog::new(), Duration::from_secs(60));
        assert!(cached.active_offers().await.unwrap().is_empty());

        // Write behind the cache's back: the snapshot stays until it expires
        cached.inner().create_offer(new_offer("Hidden")).await.unwrap();
        assert!(cached.active_offers().await.unwrap().is_empty());

        cached.invalidate().await;
        assert_eq!(cached.active_offers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_writes_through_cache_invalidate() {
        let cached = CachedCatalog::with_ttl(InMemoryCatalog::new(), Duration::from_secs(60));
        assert!(cached.active_offers().await.unwrap().is_empty());

        let offer = cached.create_offer(new_offer("Visible")).await.unwrap();
        assert_eq!(cached.active_offers().await.unwrap().len(), 1);

        cached.delete_offer(offer.id).await.unwrap();
        assert!(cached.active_offers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reloads() {
        let cached = CachedCatalog::with_ttl(InMemoryCatalog::new(), Duration::ZERO);
        assert!(cached.active_offers().await.unwrap().is_empty());

        cached.inner().create_offer(new_offer("Fresh")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(cached.active_offers().await.unwrap().len(), 1);
    }
}
