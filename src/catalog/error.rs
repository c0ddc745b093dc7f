// Error types for catalog maintenance

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised by catalog stores and admin catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// Another offer already carries this coupon code
    #[error("Coupon code '{0}' is already in use")]
    DuplicateCoupon(String),

    /// An active rule already exists for this (style, size, faces) key
    #[error(
        "An active pricing rule already exists for {style} / {size} / {number_of_faces} face(s)"
    )]
    DuplicatePricingRule {
        style: String,
        size: String,
        number_of_faces: i32,
    },

    #[error("Invalid offer: {0}")]
    InvalidOffer(String),

    #[error("Invalid pricing rule: {0}")]
    InvalidPricingRule(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn offer_not_found(id: i64) -> Self {
        CatalogError::NotFound { resource: "Offer", id }
    }

    pub fn rule_not_found(id: i64) -> Self {
        CatalogError::NotFound {
            resource: "Pricing rule",
            id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::DuplicateCoupon(_) | CatalogError::DuplicatePricingRule { .. } => {
                StatusCode::CONFLICT
            }
            CatalogError::InvalidOffer(_)
            | CatalogError::InvalidPricingRule(_)
            | CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            CatalogError::Database(e) => {
                tracing::error!("Catalog database error: {}", e);
                json!({ "error": "A database error occurred" })
            }
            CatalogError::Validation(errors) => json!({
                "error": "Request validation failed",
                "details": errors,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CatalogError::offer_not_found(3).to_string(),
            "Offer with id 3 not found"
        );
        assert_eq!(
            CatalogError::DuplicateCoupon("SAVE500".to_string()).to_string(),
            "Coupon code 'SAVE500' is already in use"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CatalogError::rule_not_found(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            CatalogError::DuplicateCoupon("X".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CatalogError::InvalidOffer("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
