use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::errors::StoreError;
use crate::services::crypto;
use crate::services::mailer::{send_best_effort, Mailer, OutboundEmail};
use crate::stores::{ResetTokenStore, UserStore};

/// How long a reset token stays redeemable.
pub const RESET_TOKEN_TTL_SECS: i64 = 3600;

/// Shortest password accepted from a reset.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Error, Debug)]
pub enum ResetError {
    #[error("invalid or expired reset token")]
    InvalidToken,

    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Password-reset token lifecycle.
///
/// Tokens are random, single use, and stored only as keyed hashes so a
/// database leak cannot be replayed into credential takeover. Requests
/// for unknown emails complete silently to avoid account enumeration.
pub struct PasswordResetService {
    db: DatabaseConnection,
    users: UserStore,
    tokens: ResetTokenStore,
    token_secret: String,
    mailer: Arc<dyn Mailer>,
}

impl PasswordResetService {
    pub fn new(
        db: DatabaseConnection,
        users: UserStore,
        tokens: ResetTokenStore,
        token_secret: String,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            users,
            tokens,
            token_secret,
            mailer,
        }
    }

    /// Issue a reset token for the account behind `email`, if any.
    /// Always succeeds from the caller's perspective; whether the email
    /// matched an account is not observable.
    pub async fn request_reset(&self, email: &str) -> Result<(), ResetError> {
        let user = match self.users.find_by_email(&self.db, email).await? {
            Some(user) if user.is_active => user,
            _ => {
                info!("Password reset requested for unmatched email");
                return Ok(());
            }
        };

        let token = crypto::generate_reset_token();
        let token_hash = crypto::hmac_sha256_token(&self.token_secret, &token);
        let expires_at = Utc::now().timestamp() + RESET_TOKEN_TTL_SECS;

        self.tokens
            .insert(&self.db, &user.id, &token_hash, expires_at)
            .await?;
        info!(user_id = %user.id, "Password reset token issued");

        send_best_effort(
            self.mailer.as_ref(),
            OutboundEmail::PasswordReset {
                to: user.email,
                reset_token: token,
            },
        )
        .await;

        Ok(())
    }

    /// Check whether a presented token is currently redeemable, without
    /// consuming it. Returns the owning account id. Used by the reset form
    /// before asking for a password.
    pub async fn validate_token(&self, token: &str) -> Result<String, ResetError> {
        let token_hash = crypto::hmac_sha256_token(&self.token_secret, token);
        let now = Utc::now().timestamp();

        self.tokens
            .find_valid(&self.db, &token_hash, now)
            .await?
            .map(|record| record.user_id)
            .ok_or(ResetError::InvalidToken)
    }

    /// Redeem a token and set the new password. The token consume and the
    /// credential update share one transaction, so a token is spent exactly
    /// when the password actually changed.
    pub async fn consume_reset(&self, token: &str, new_password: &str) -> Result<(), ResetError> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(ResetError::WeakPassword);
        }

        let token_hash = crypto::hmac_sha256_token(&self.token_secret, token);
        let now = Utc::now().timestamp();
        let password_hash = crypto::hash_password(new_password)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::database("begin reset transaction", e))?;

        let record = self
            .tokens
            .find_valid(&txn, &token_hash, now)
            .await?
            .ok_or(ResetError::InvalidToken)?;

        if !self.tokens.consume(&txn, &token_hash, now).await? {
            return Err(ResetError::InvalidToken);
        }

        self.users
            .set_password_hash(&txn, &record.user_id, &password_hash)
            .await?;

        txn.commit()
            .await
            .map_err(|e| StoreError::database("commit reset transaction", e))?;

        info!(user_id = %record.user_id, "Password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::MailerError;
    use crate::types::internal::Role;
    use async_trait::async_trait;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use std::sync::Mutex;

    struct RecordingMailer {
        sent: Mutex<Vec<OutboundEmail>>,
    }

    impl RecordingMailer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
            })
        }

        fn last_reset_token(&self) -> Option<String> {
            self.sent.lock().unwrap().iter().rev().find_map(|e| match e {
                OutboundEmail::PasswordReset { reset_token, .. } => Some(reset_token.clone()),
                _ => None,
            })
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }

    async fn setup_service() -> (PasswordResetService, Arc<RecordingMailer>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let mailer = RecordingMailer::new();
        let service = PasswordResetService::new(
            db,
            UserStore,
            ResetTokenStore,
            "test-reset-secret".to_string(),
            mailer.clone(),
        );
        (service, mailer)
    }

    async fn create_user(service: &PasswordResetService, email: &str) -> String {
        let hash = crypto::hash_password("original-password").unwrap();
        UserStore
            .insert(&service.db, email, "A Parent", Role::Parent, &hash)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_full_reset_flow() {
        let (service, mailer) = setup_service().await;
        let user_id = create_user(&service, "parent@example.com").await;

        service.request_reset("parent@example.com").await.unwrap();
        let token = mailer.last_reset_token().expect("No reset email sent");

        service.validate_token(&token).await.unwrap();
        service.consume_reset(&token, "brand-new-password").await.unwrap();

        let user = UserStore
            .find_by_id(&service.db, &user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(crypto::verify_password("brand-new-password", &user.password_hash).unwrap());
        assert!(!crypto::verify_password("original-password", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_request_for_unknown_email_is_silent() {
        let (service, mailer) = setup_service().await;

        service.request_reset("nobody@example.com").await.unwrap();

        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_is_single_use() {
        let (service, mailer) = setup_service().await;
        create_user(&service, "parent@example.com").await;

        service.request_reset("parent@example.com").await.unwrap();
        let token = mailer.last_reset_token().unwrap();

        service.consume_reset(&token, "brand-new-password").await.unwrap();

        match service.consume_reset(&token, "another-password").await {
            Err(ResetError::InvalidToken) => {}
            other => panic!("Expected InvalidToken, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_weak_password_leaves_token_valid() {
        let (service, mailer) = setup_service().await;
        create_user(&service, "parent@example.com").await;

        service.request_reset("parent@example.com").await.unwrap();
        let token = mailer.last_reset_token().unwrap();

        match service.consume_reset(&token, "short").await {
            Err(ResetError::WeakPassword) => {}
            other => panic!("Expected WeakPassword, got {:?}", other.map(|_| ())),
        }

        // The rejected attempt did not spend the token
        service.validate_token(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_bogus_token_is_rejected() {
        let (service, _mailer) = setup_service().await;

        match service.validate_token("definitely-not-issued").await {
            Err(ResetError::InvalidToken) => {}
            other => panic!("Expected InvalidToken, got {:?}", other.map(|_| ())),
        }

        match service.consume_reset("definitely-not-issued", "long-enough-pass").await {
            Err(ResetError::InvalidToken) => {}
            other => panic!("Expected InvalidToken, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_raw_token_is_never_stored() {
        let (service, mailer) = setup_service().await;
        create_user(&service, "parent@example.com").await;

        service.request_reset("parent@example.com").await.unwrap();
        let token = mailer.last_reset_token().unwrap();

        let stored = service
            .tokens
            .find_valid(
                &service.db,
                &crypto::hmac_sha256_token("test-reset-secret", &token),
                Utc::now().timestamp(),
            )
            .await
            .unwrap()
            .expect("Token row not found");
        assert_ne!(stored.token_hash, token);
    }
}
