// HTTP handlers for the pricing catalog and offers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::pricing::models::{FrameOption, NewOffer, NewPricingRule, Offer, PricingRule};
use crate::AppState;

/// Handler for GET /api/pricing
/// Lists active pricing rules for the storefront dropdowns
pub async fn list_active_pricing_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<PricingRule>>, ApiError> {
    let rules = state.catalog.active_rules().await?;
    Ok(Json(rules))
}

/// Handler for GET /api/frames
pub async fn list_frames_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<FrameOption>>, ApiError> {
    let frames = state.catalog.active_frames().await?;
    Ok(Json(frames))
}

/// Handler for GET /api/admin/pricing
/// Lists every pricing rule including deactivated ones (Admin only)
pub async fn list_pricing_rules_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<PricingRule>>, ApiError> {
    let rules = state.catalog.list_rules().await?;
    Ok(Json(rules))
}

/// Handler for POST /api/admin/pricing (Admin only)
pub async fn create_pricing_rule_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<NewPricingRule>,
) -> Result<(StatusCode, Json<PricingRule>), ApiError> {
    let rule = state.catalog.create_rule(request).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Handler for PUT /api/admin/pricing/:id (Admin only)
pub async fn update_pricing_rule_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<NewPricingRule>,
) -> Result<Json<PricingRule>, ApiError> {
    let rule = state.catalog.update_rule(id, request).await?;
    Ok(Json(rule))
}

/// Handler for GET /api/admin/offers (Admin only)
pub async fn list_offers_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Offer>>, ApiError> {
    let offers = state.catalog.list_offers().await?;
    Ok(Json(offers))
}

/// Handler for POST /api/admin/offers (Admin only)
pub async fn create_offer_handler(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<NewOffer>,
) -> Result<(StatusCode, Json<Offer>), ApiError> {
    let offer = state.catalog.create_offer(request).await?;
    tracing::info!("Offer {} created by {}", offer.id, admin.subject);
    Ok((StatusCode::CREATED, Json(offer)))
}

/// Handler for GET /api/admin/offers/:id (Admin only)
pub async fn get_offer_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Offer>, ApiError> {
    let offer = state.catalog.get_offer(id).await?;
    Ok(Json(offer))
}

/// Handler for PUT /api/admin/offers/:id (Admin only)
pub async fn update_offer_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<NewOffer>,
) -> Result<Json<Offer>, ApiError> {
    let offer = state.catalog.update_offer(id, request).await?;
    Ok(Json(offer))
}

/// Handler for DELETE /api/admin/offers/:id (Admin only)
pub async fn delete_offer_handler(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_offer(id).await?;
    tracing::info!("Offer {} deleted by {}", id, admin.subject);
    Ok(StatusCode::NO_CONTENT)
}
