use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::catalog::CatalogError;
use crate::orders::status_machine::InvalidTransition;
use crate::pricing::PricingError;

/// Error types for order operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Order not found")]
    NotFound,

    /// Base price could not be resolved; the order is rejected
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Frame option {0} is not available")]
    FrameNotFound(i64),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Could not allocate a unique order number")]
    OrderNumberExhausted,

    /// Order number already taken; the service retries with a fresh one
    #[error("Order number {0} already exists")]
    DuplicateOrderNumber(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(errors) => OrderError::ValidationError(errors.to_string()),
            other => OrderError::DatabaseError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for OrderError {
    fn from(errors: validator::ValidationErrors) -> Self {
        OrderError::ValidationError(errors.to_string())
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            OrderError::DatabaseError(msg) => {
                tracing::error!("Order store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            OrderError::NotFound => (StatusCode::NOT_FOUND, "Order not found".to_string()),
            OrderError::Pricing(e) => return e.into_response(),
            OrderError::FrameNotFound(id) => (
                StatusCode::BAD_REQUEST,
                format!("Frame option {} is not available", id),
            ),
            OrderError::InvalidTransition(e) => {
                tracing::warn!("Rejected status change: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            OrderError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            OrderError::OrderNumberExhausted | OrderError::DuplicateOrderNumber(_) => {
                tracing::error!("Order number allocation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not place the order, please retry".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::StatusField;

    #[test]
    fn test_status_codes() {
        let response = OrderError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = OrderError::from(InvalidTransition {
            field: StatusField::Fulfillment,
            requested: "SHIPPED".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = OrderError::from(PricingError::PricingNotFound {
            style: "Oil Painting".to_string(),
            size: "A1".to_string(),
            number_of_faces: 1,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = OrderError::DatabaseError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_pricing_message_is_transparent() {
        let err = OrderError::from(PricingError::InvalidInput("blank style".to_string()));
        assert_eq!(err.to_string(), "Invalid pricing input: blank style");
    }
}
