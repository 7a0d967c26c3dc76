// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod registrations;
pub mod roles;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use registrations::RegistrationApi;
pub use roles::RoleApi;

use poem_openapi::{auth::Bearer, SecurityScheme};

use crate::services::token_service::{TokenError, TokenService};
use crate::types::internal::Role;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(Bearer);

/// The caller identity established from a bearer token.
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: Role,
}

/// Why a bearer token was not accepted.
pub enum AuthFailure {
    Invalid,
    Expired,
}

/// Validate a bearer token and parse the role claim. Each API maps the
/// failure into its own response enum.
pub fn verify_bearer(tokens: &TokenService, auth: &BearerAuth) -> Result<AuthenticatedUser, AuthFailure> {
    let claims = tokens.validate_jwt(&auth.0.token).map_err(|e| match e {
        TokenError::Expired => AuthFailure::Expired,
        _ => AuthFailure::Invalid,
    })?;

    // A role claim outside the registry means the token was minted against
    // a different registry version; treat it as invalid.
    let role = claims.role.parse::<Role>().map_err(|_| AuthFailure::Invalid)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role,
    })
}
