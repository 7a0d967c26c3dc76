use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::errors::StoreError;
use crate::types::db::password_reset_token::{self, Entity as ResetToken};

/// Data access for single-use password-reset tokens.
///
/// Only token hashes are stored; the opaque token itself exists solely in
/// the reset email.
pub struct ResetTokenStore;

impl ResetTokenStore {
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<password_reset_token::Model, StoreError> {
        let model = password_reset_token::ActiveModel {
            id: NotSet,
            user_id: Set(user_id.to_string()),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(expires_at),
            used: Set(false),
            used_at: Set(None),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| StoreError::database("insert reset token", e))
    }

    /// Look up a token that is unused and unexpired as of `now`.
    pub async fn find_valid(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
        now: i64,
    ) -> Result<Option<password_reset_token::Model>, StoreError> {
        ResetToken::find()
            .filter(password_reset_token::Column::TokenHash.eq(token_hash))
            .filter(password_reset_token::Column::Used.eq(false))
            .filter(password_reset_token::Column::ExpiresAt.gt(now))
            .one(conn)
            .await
            .map_err(|e| StoreError::database("find reset token", e))
    }

    /// Mark a token used iff it is still valid, in one conditional update.
    /// Returns true when exactly this call consumed the token; a concurrent
    /// or repeated consume observes false. The caller performs the paired
    /// credential update on the same transaction.
    pub async fn consume(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
        now: i64,
    ) -> Result<bool, StoreError> {
        let result = ResetToken::update_many()
            .col_expr(password_reset_token::Column::Used, Expr::value(true))
            .col_expr(password_reset_token::Column::UsedAt, Expr::value(Some(now)))
            .filter(password_reset_token::Column::TokenHash.eq(token_hash))
            .filter(password_reset_token::Column::Used.eq(false))
            .filter(password_reset_token::Column::ExpiresAt.gt(now))
            .exec(conn)
            .await
            .map_err(|e| StoreError::database("consume reset token", e))?;

        Ok(result.rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::UserStore;
    use crate::types::internal::Role;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> (DatabaseConnection, String) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let user = UserStore
            .insert(&db, "owner@example.com", "Owner", Role::Parent, "hash")
            .await
            .expect("Failed to insert user");

        (db, user.id)
    }

    #[tokio::test]
    async fn test_find_valid_honors_expiry_and_used_flag() {
        let (db, user_id) = setup_test_db().await;
        let store = ResetTokenStore;
        let now = Utc::now().timestamp();

        store
            .insert(&db, &user_id, "fresh-hash", now + 3600)
            .await
            .expect("Failed to insert token");
        store
            .insert(&db, &user_id, "expired-hash", now - 1)
            .await
            .expect("Failed to insert token");

        assert!(store
            .find_valid(&db, "fresh-hash", now)
            .await
            .expect("Failed to query token")
            .is_some());
        assert!(store
            .find_valid(&db, "expired-hash", now)
            .await
            .expect("Failed to query token")
            .is_none());
        assert!(store
            .find_valid(&db, "no-such-hash", now)
            .await
            .expect("Failed to query token")
            .is_none());
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let (db, user_id) = setup_test_db().await;
        let store = ResetTokenStore;
        let now = Utc::now().timestamp();

        store
            .insert(&db, &user_id, "one-shot", now + 3600)
            .await
            .expect("Failed to insert token");

        assert!(store
            .consume(&db, "one-shot", now)
            .await
            .expect("Failed to consume token"));

        // Second consume finds no unused row
        assert!(!store
            .consume(&db, "one-shot", now)
            .await
            .expect("Failed to consume token"));

        // The row records when it was consumed
        let row = ResetToken::find()
            .filter(password_reset_token::Column::TokenHash.eq("one-shot"))
            .one(&db)
            .await
            .expect("Failed to query token")
            .expect("Token not found");
        assert!(row.used);
        assert_eq!(row.used_at, Some(now));
    }

    #[tokio::test]
    async fn test_consume_rejects_expired_token() {
        let (db, user_id) = setup_test_db().await;
        let store = ResetTokenStore;
        let now = Utc::now().timestamp();

        store
            .insert(&db, &user_id, "stale", now - 3600)
            .await
            .expect("Failed to insert token");

        assert!(!store
            .consume(&db, "stale", now)
            .await
            .expect("Failed to consume token"));
    }
}
