// Error handling module for the portrait order API
// Structured error responses for the admin catalog endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::catalog::CatalogError;

/// General API error with a structured JSON body
#[derive(Debug)]
pub enum ApiError {
    /// Field-level request validation failures (400)
    ValidationError(validator::ValidationErrors),

    /// Request is well-formed but breaks a domain rule (400)
    BadRequest(String),

    /// Resource not found by id (404)
    NotFound { resource: String, id: String },

    /// Uniqueness conflict (409)
    Conflict { message: String },

    /// Database failure; details are logged, never returned (500)
    DatabaseError(sqlx::Error),

    /// Anything else unexpected (500)
    InternalError(String),
}

/// Consistent error response structure
///
/// `error_code` is machine-readable ("VALIDATION_ERROR", "NOT_FOUND", ...),
/// `message` is for humans, `details` carries field-level errors when present.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(
        error_code: &str,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Build the status and body, logging at a level that matches severity
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let body = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse::new(
                    "VALIDATION_ERROR",
                    "Request validation failed",
                    Some(serde_json::to_value(errors).unwrap_or_else(|_| serde_json::json!({}))),
                )
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                ErrorResponse::new("BAD_REQUEST", message.clone(), None)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                let message = format!("{} with id {} not found", resource, id);
                ErrorResponse::new("NOT_FOUND", message, None)
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone(), None)
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred", None)
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred", None)
            }
        };

        (self.status_code(), body)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Database(e) => ApiError::DatabaseError(e),
            CatalogError::Validation(errors) => ApiError::ValidationError(errors),
            CatalogError::NotFound { resource, id } => ApiError::NotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            },
            e @ (CatalogError::DuplicateCoupon(_) | CatalogError::DuplicatePricingRule { .. }) => {
                ApiError::Conflict {
                    message: e.to_string(),
                }
            }
            e @ (CatalogError::InvalidOffer(_) | CatalogError::InvalidPricingRule(_)) => {
                ApiError::BadRequest(e.to_string())
            }
        }
    }
}
