pub mod auth;
pub mod cors;

pub use auth::{current_claims, require_admin, AuthMiddleware};
pub use cors::create_cors;
