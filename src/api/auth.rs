use poem_openapi::{payload::Json, OpenApi, Tags};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::{verify_bearer, AuthFailure, BearerAuth};
use crate::errors::auth::AuthError;
use crate::services::password_reset::{PasswordResetService, ResetError, MIN_PASSWORD_LENGTH};
use crate::services::{crypto, MenuFilter, TokenService};
use crate::stores::UserStore;
use crate::types::dto::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest, UserSummary,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::Role;

/// Authentication API endpoints
pub struct AuthApi {
    db: DatabaseConnection,
    users: UserStore,
    tokens: Arc<TokenService>,
    menus: Arc<MenuFilter>,
    password_reset: Arc<PasswordResetService>,
}

impl AuthApi {
    pub fn new(
        db: DatabaseConnection,
        users: UserStore,
        tokens: Arc<TokenService>,
        menus: Arc<MenuFilter>,
        password_reset: Arc<PasswordResetService>,
    ) -> Self {
        Self {
            db,
            users,
            tokens,
            menus,
            password_reset,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with email and password to receive an access token
    ///
    /// The response carries the role's resolved menu list so the dashboard
    /// renders without a second request.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let user = self
            .users
            .find_by_email(&self.db, &body.email)
            .await?
            .ok_or_else(AuthError::invalid_credentials)?;

        if !user.is_active {
            return Err(AuthError::invalid_credentials());
        }

        if !crypto::verify_password(&body.password, &user.password_hash)? {
            return Err(AuthError::invalid_credentials());
        }

        let role = user.role.parse::<Role>().map_err(|e| {
            error!(user_id = %user.id, error = %e, "Account carries a role outside the registry");
            AuthError::internal_error()
        })?;

        let access_token = self.tokens.generate_jwt(&user.id, role).map_err(|e| {
            error!(error = %e, "Failed to sign access token");
            AuthError::internal_error()
        })?;

        let menus = self.menus.accessible_menus(&self.db, role).await;

        info!(user_id = %user.id, role = %role, "User logged in");

        Ok(Json(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.expires_in(),
            user: UserSummary {
                id: user.id,
                display_name: user.display_name,
                role: role.as_str().to_string(),
            },
            menus: menus.iter().map(|m| m.as_str().to_string()).collect(),
        }))
    }

    /// Return the signed-in user behind a bearer token
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserSummary>, AuthError> {
        let caller = verify_bearer(&self.tokens, &auth).map_err(|e| match e {
            AuthFailure::Expired => AuthError::expired_token(),
            AuthFailure::Invalid => AuthError::invalid_token(),
        })?;

        let user = self
            .users
            .find_by_id(&self.db, &caller.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(AuthError::invalid_token)?;

        Ok(Json(UserSummary {
            id: user.id,
            display_name: user.display_name,
            role: caller.role.as_str().to_string(),
        }))
    }

    /// Request a password-reset email
    ///
    /// Always answers with the same message so callers cannot probe which
    /// emails have accounts.
    #[oai(path = "/forgot-password", method = "post", tag = "AuthTags::Authentication")]
    async fn forgot_password(
        &self,
        body: Json<ForgotPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        if let Err(e) = self.password_reset.request_reset(&body.email).await {
            // Still answer generically; the failure is an operator concern.
            error!(error = %e, "Password reset request failed internally");
        }

        Ok(Json(MessageResponse {
            message: "If the email matches an account, a reset link has been sent".to_string(),
        }))
    }

    /// Redeem a reset token and set a new password
    #[oai(path = "/reset-password", method = "put", tag = "AuthTags::Authentication")]
    async fn reset_password(
        &self,
        body: Json<ResetPasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        self.password_reset
            .consume_reset(&body.token, &body.new_password)
            .await
            .map_err(|e| match e {
                ResetError::InvalidToken => AuthError::invalid_reset_token(),
                ResetError::WeakPassword => AuthError::weak_password(MIN_PASSWORD_LENGTH),
                ResetError::Store(store) => AuthError::from(store),
            })?;

        Ok(Json(MessageResponse {
            message: "Password has been reset".to_string(),
        }))
    }
}
