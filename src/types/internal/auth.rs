use serde::{Deserialize, Serialize};

/// JWT claims carried by dashboard access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID)
    pub sub: String,
    /// Role name at token issuance
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}
