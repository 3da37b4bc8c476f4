//! Bearer-token authentication.

pub mod jwt;
pub mod models;

pub use jwt::{parse_bearer, JwtService};
pub use models::JwtClaims;
