// Postgres-backed catalog

use async_trait::async_trait;
use sqlx::PgPool;

use crate::catalog::{
    error::{CatalogError, CatalogResult},
    store::{OfferCatalog, PricingCatalog},
};
use crate::pricing::models::{FrameOption, NewOffer, NewPricingRule, Offer, PricingRule};

const RULE_COLUMNS: &str = "id, style, size, number_of_faces, base_price, is_active";

const OFFER_COLUMNS: &str = "id, title, offer_type, value, max_discount, coupon_code, is_active, \
     priority, start_date, end_date, min_order_value, applicable_styles, first_order_only";

/// Repository for pricing rules, frames and offers
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether another offer already carries `code`
    async fn coupon_taken(&self, code: &str, exclude_id: Option<i64>) -> CatalogResult<bool> {
        let exists: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM offers
                WHERE coupon_code = $1 AND ($2::BIGINT IS NULL OR id != $2)
            )
            "#,
        )
        .bind(code)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Check whether another active rule already owns the natural key
    async fn rule_key_taken(
        &self,
        rule: &NewPricingRule,
        exclude_id: Option<i64>,
    ) -> CatalogResult<bool> {
        if !rule.is_active {
            return Ok(false);
        }

        let exists: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM pricing_rules
                WHERE style = $1 AND size = $2 AND number_of_faces = $3
                  AND is_active AND ($4::BIGINT IS NULL OR id != $4)
            )
            "#,
        )
        .bind(&rule.style)
        .bind(&rule.size)
        .bind(rule.number_of_faces)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }
}

fn duplicate_rule(rule: &NewPricingRule) -> CatalogError {
    CatalogError::DuplicatePricingRule {
        style: rule.style.clone(),
        size: rule.size.clone(),
        number_of_faces: rule.number_of_faces,
    }
}

/// Map a unique-index violation to the domain conflict; the EXISTS checks
/// above can race with a concurrent admin write
fn map_unique_violation(
    error: sqlx::Error,
    conflict: impl FnOnce() -> CatalogError,
) -> CatalogError {
    if let Some(db_err) = error.as_database_error() {
        if db_err.is_unique_violation() {
            return conflict();
        }
    }
    CatalogError::Database(error)
}

#[async_trait]
impl PricingCatalog for PgCatalogRepository {
    async fn active_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        let rules = sqlx::query_as::<_, PricingRule>(&format!(
            "SELECT {} FROM pricing_rules WHERE is_active = true ORDER BY id",
            RULE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    async fn list_rules(&self) -> CatalogResult<Vec<PricingRule>> {
        let rules = sqlx::query_as::<_, PricingRule>(&format!(
            "SELECT {} FROM pricing_rules ORDER BY style, size, number_of_faces, id",
            RULE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    async fn create_rule(&self, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        if self.rule_key_taken(&rule, None).await? {
            return Err(duplicate_rule(&rule));
        }

        let created = sqlx::query_as::<_, PricingRule>(&format!(
            r#"
            INSERT INTO pricing_rules (style, size, number_of_faces, base_price, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            RULE_COLUMNS
        ))
        .bind(&rule.style)
        .bind(&rule.size)
        .bind(rule.number_of_faces)
        .bind(rule.base_price)
        .bind(rule.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || duplicate_rule(&rule)))?;

        Ok(created)
    }

    async fn update_rule(&self, id: i64, rule: NewPricingRule) -> CatalogResult<PricingRule> {
        if self.rule_key_taken(&rule, Some(id)).await? {
            return Err(duplicate_rule(&rule));
        }

        let updated = sqlx::query_as::<_, PricingRule>(&format!(
            r#"
            UPDATE pricing_rules
            SET style = $2, size = $3, number_of_faces = $4, base_price = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            RULE_COLUMNS
        ))
        .bind(id)
        .bind(&rule.style)
        .bind(&rule.size)
        .bind(rule.number_of_faces)
        .bind(rule.base_price)
        .bind(rule.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || duplicate_rule(&rule)))?;

        updated.ok_or_else(|| CatalogError::rule_not_found(id))
    }

    async fn active_frames(&self) -> CatalogResult<Vec<FrameOption>> {
        let frames = sqlx::query_as::<_, FrameOption>(
            r#"
            SELECT id, name, price, is_active FROM frames
            WHERE is_active = true
            ORDER BY price, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(frames)
    }
}

#[async_trait]
impl OfferCatalog for PgCatalogRepository {
    async fn active_offers(&self) -> CatalogResult<Vec<Offer>> {
        let offers = sqlx::query_as::<_, Offer>(&format!(
            "SELECT {} FROM offers WHERE is_active = true ORDER BY priority DESC, id",
            OFFER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    async fn list_offers(&self) -> CatalogResult<Vec<Offer>> {
        let offers = sqlx::query_as::<_, Offer>(&format!(
            "SELECT {} FROM offers ORDER BY priority DESC, id",
            OFFER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    async fn find_offer(&self, id: i64) -> CatalogResult<Option<Offer>> {
        let offer = sqlx::query_as::<_, Offer>(&format!(
            "SELECT {} FROM offers WHERE id = $1",
            OFFER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offer)
    }

    async fn create_offer(&self, offer: NewOffer) -> CatalogResult<Offer> {
        if let Some(code) = offer.coupon_code.as_deref() {
            if self.coupon_taken(code, None).await? {
                return Err(CatalogError::DuplicateCoupon(code.to_string()));
            }
        }

        let code = offer.coupon_code.clone().unwrap_or_default();
        let created = sqlx::query_as::<_, Offer>(&format!(
            r#"
            INSERT INTO offers (
                title, offer_type, value, max_discount, coupon_code, is_active, priority,
                start_date, end_date, min_order_value, applicable_styles, first_order_only
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            OFFER_COLUMNS
        ))
        .bind(&offer.title)
        .bind(offer.offer_type)
        .bind(offer.value)
        .bind(offer.max_discount)
        .bind(&offer.coupon_code)
        .bind(offer.is_active)
        .bind(offer.priority)
        .bind(offer.start_date)
        .bind(offer.end_date)
        .bind(offer.min_order_value)
        .bind(&offer.applicable_styles)
        .bind(offer.first_order_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || CatalogError::DuplicateCoupon(code)))?;

        tracing::info!("Created offer {} ({})", created.id, created.offer_type);
        Ok(created)
    }

    async fn update_offer(&self, id: i64, offer: NewOffer) -> CatalogResult<Offer> {
        if let Some(code) = offer.coupon_code.as_deref() {
            if self.coupon_taken(code, Some(id)).await? {
                return Err(CatalogError::DuplicateCoupon(code.to_string()));
            }
        }

        let code = offer.coupon_code.clone().unwrap_or_default();
        let updated = sqlx::query_as::<_, Offer>(&format!(
            r#"
            UPDATE offers
            SET title = $2, offer_type = $3, value = $4, max_discount = $5, coupon_code = $6,
                is_active = $7, priority = $8, start_date = $9, end_date = $10,
                min_order_value = $11, applicable_styles = $12, first_order_only = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            OFFER_COLUMNS
        ))
        .bind(id)
        .bind(&offer.title)
        .bind(offer.offer_type)
        .bind(offer.value)
        .bind(offer.max_discount)
        .bind(&offer.coupon_code)
        .bind(offer.is_active)
        .bind(offer.priority)
        .bind(offer.start_date)
        .bind(offer.end_date)
        .bind(offer.min_order_value)
        .bind(&offer.applicable_styles)
        .bind(offer.first_order_only)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || CatalogError::DuplicateCoupon(code)))?;

        updated.ok_or_else(|| CatalogError::offer_not_found(id))
    }

    async fn delete_offer(&self, id: i64) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::offer_not_found(id));
        }

        tracing::info!("Deleted offer {}", id);
        Ok(())
    }
}
