use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::Role;

/// Data access for user accounts.
///
/// Only stores pre-hashed credentials; hashing lives in the crypto service
/// so plaintext passwords never reach this layer.
pub struct UserStore;

impl UserStore {
    pub async fn find_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| StoreError::database("find user by email", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| StoreError::database("find user by id", e))
    }

    /// Insert a new account and return the created row.
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        display_name: &str,
        role: Role,
        password_hash: &str,
    ) -> Result<user::Model, StoreError> {
        let now = Utc::now().timestamp();

        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            display_name: Set(display_name.to_string()),
            role: Set(role.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_user
            .insert(conn)
            .await
            .map_err(|e| StoreError::database("insert user", e))
    }

    /// Replace an account's role. Single-row update, atomic on its own.
    pub async fn set_role(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
        role: Role,
    ) -> Result<(), StoreError> {
        let update = user::ActiveModel {
            id: Set(id.to_string()),
            role: Set(role.as_str().to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        update.update(conn).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => StoreError::not_found("user"),
            e => StoreError::database("update user role", e),
        })?;

        Ok(())
    }

    /// Replace an account's credential hash.
    pub async fn set_password_hash(
        &self,
        conn: &impl ConnectionTrait,
        id: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let update = user::ActiveModel {
            id: Set(id.to_string()),
            password_hash: Set(password_hash.to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        update.update(conn).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => StoreError::not_found("user"),
            e => StoreError::database("update user password", e),
        })?;

        Ok(())
    }
}
