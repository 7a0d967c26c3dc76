use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for dashboard login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}

/// Signed-in user summary returned alongside the access token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID (UUID)
    pub id: String,

    /// Display name
    pub display_name: String,

    /// Role name
    pub role: String,
}

/// Response model for login, carrying the access token plus the role's
/// resolved menu list so the client needs no second round trip
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    /// Signed-in user summary
    pub user: UserSummary,

    /// Dashboard menu identifiers this role may see
    pub menus: Vec<String>,
}

/// Request model for requesting a password-reset email
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email of the account to reset
    pub email: String,
}

/// Request model for consuming a password-reset token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Opaque reset token from the reset email
    pub token: String,

    /// New password to set
    pub new_password: String,
}
