// Error types for the pricing core

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while resolving a base price
///
/// Promotion selection never fails: an unusable coupon degrades to no discount
/// and is reported through `RejectionReason` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// No active pricing rule matches the requested combination.
    /// The order must be rejected rather than priced by guesswork.
    #[error("No active pricing for style '{style}', size '{size}' with {number_of_faces} face(s)")]
    PricingNotFound {
        style: String,
        size: String,
        number_of_faces: i32,
    },

    /// The selection itself is malformed (blank style/size, face count below one)
    #[error("Invalid pricing input: {0}")]
    InvalidInput(String),
}

/// Result type alias for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let status = match &self {
            PricingError::PricingNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PricingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };

        tracing::debug!("Pricing rejected: {}", self);

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
