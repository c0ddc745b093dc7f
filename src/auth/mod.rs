// Authentication module
// Verifies bearer JWTs and gates the admin API on the admin role

pub mod error;
pub mod middleware;
pub mod models;
pub mod token;

pub use error::AuthError;
pub use middleware::AdminUser;
pub use models::Role;
pub use token::{Claims, TokenService};
