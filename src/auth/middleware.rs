// Admin extractor for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// An authenticated caller holding the admin role
///
/// Add it as a handler argument to protect the route.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub subject: String,
}

/// Pull the bearer token out of the `Authorization` header
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let endpoint = parts.uri.path().to_string();
        let token = bearer_token(parts).map_err(|e| {
            warn!("Rejected admin request to {}: {}", endpoint, e);
            e
        })?;

        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.validate_token(token)?;

        if claims.role != Role::Admin {
            return Err(AuthError::InsufficientPermissions {
                required: Role::Admin,
                actual: claims.role,
            });
        }

        debug!("Admin {} authorized for {}", claims.sub, endpoint);
        Ok(AdminUser {
            subject: claims.sub,
        })
    }
}
