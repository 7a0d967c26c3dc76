use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::StoreError;
use crate::types::db::registration::{self, Entity as Registration, RegistrationStatus};

/// Fields captured from a public registration submission.
pub struct NewRegistration {
    pub child_name: String,
    pub child_birth_date: Option<String>,
    pub guardian_name: String,
    pub guardian_email: String,
    pub guardian_phone: Option<String>,
}

/// Review metadata recorded with an approve/reject decision.
pub struct ReviewDecision {
    pub status: RegistrationStatus,
    pub account_id: Option<String>,
    pub reviewed_by: String,
    pub note: Option<String>,
}

/// Data access for prospective-student registrations.
pub struct RegistrationStore;

impl RegistrationStore {
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new: NewRegistration,
    ) -> Result<registration::Model, StoreError> {
        let now = Utc::now().timestamp();

        let model = registration::ActiveModel {
            id: NotSet,
            child_name: Set(new.child_name),
            child_birth_date: Set(new.child_birth_date),
            guardian_name: Set(new.guardian_name),
            guardian_email: Set(new.guardian_email),
            guardian_phone: Set(new.guardian_phone),
            status: Set(RegistrationStatus::Pending),
            account_id: Set(None),
            review_note: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| StoreError::database("insert registration", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<registration::Model>, StoreError> {
        Registration::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| StoreError::database("find registration", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<registration::Model>, StoreError> {
        Registration::find()
            .order_by_desc(registration::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| StoreError::database("list registrations", e))
    }

    /// Apply a review decision as a conditional update: only a row that is
    /// still pending is touched. Returns the number of rows affected, so a
    /// concurrent second reviewer observes 0 and backs off instead of
    /// double-promoting the same registration.
    pub async fn mark_reviewed(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        decision: ReviewDecision,
    ) -> Result<u64, StoreError> {
        let now = Utc::now().timestamp();

        let result = Registration::update_many()
            .col_expr(
                registration::Column::Status,
                Expr::value(decision.status.as_str()),
            )
            .col_expr(
                registration::Column::AccountId,
                Expr::value(decision.account_id),
            )
            .col_expr(
                registration::Column::ReviewedBy,
                Expr::value(Some(decision.reviewed_by)),
            )
            .col_expr(registration::Column::ReviewNote, Expr::value(decision.note))
            .col_expr(registration::Column::ReviewedAt, Expr::value(Some(now)))
            .col_expr(registration::Column::UpdatedAt, Expr::value(now))
            .filter(registration::Column::Id.eq(id))
            .filter(registration::Column::Status.eq(RegistrationStatus::Pending.as_str()))
            .exec(conn)
            .await
            .map_err(|e| StoreError::database("mark registration reviewed", e))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    fn sample_registration() -> NewRegistration {
        NewRegistration {
            child_name: "Anak Contoh".to_string(),
            child_birth_date: Some("2019-06-02".to_string()),
            guardian_name: "Orang Tua".to_string(),
            guardian_email: "guardian@example.com".to_string(),
            guardian_phone: Some("+62-811-000-000".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_creates_pending_registration() {
        let db = setup_test_db().await;
        let store = RegistrationStore;

        let created = store
            .insert(&db, sample_registration())
            .await
            .expect("Failed to insert registration");

        assert_eq!(created.status, RegistrationStatus::Pending);
        assert!(created.account_id.is_none());
        assert!(created.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn test_mark_reviewed_only_touches_pending_rows() {
        let db = setup_test_db().await;
        let store = RegistrationStore;

        let created = store
            .insert(&db, sample_registration())
            .await
            .expect("Failed to insert registration");

        let rows = store
            .mark_reviewed(
                &db,
                created.id,
                ReviewDecision {
                    status: RegistrationStatus::Approved,
                    account_id: None,
                    reviewed_by: "staff-1".to_string(),
                    note: Some("ok".to_string()),
                },
            )
            .await
            .expect("Failed to mark reviewed");
        assert_eq!(rows, 1);

        // A second decision on the same registration affects no rows
        let rows = store
            .mark_reviewed(
                &db,
                created.id,
                ReviewDecision {
                    status: RegistrationStatus::Rejected,
                    account_id: None,
                    reviewed_by: "staff-2".to_string(),
                    note: None,
                },
            )
            .await
            .expect("Failed to mark reviewed");
        assert_eq!(rows, 0);

        let reloaded = store
            .find_by_id(&db, created.id)
            .await
            .expect("Failed to query registration")
            .expect("Registration not found");
        assert_eq!(reloaded.status, RegistrationStatus::Approved);
        assert_eq!(reloaded.reviewed_by.as_deref(), Some("staff-1"));
        assert!(reloaded.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_mark_reviewed_missing_id_affects_no_rows() {
        let db = setup_test_db().await;
        let store = RegistrationStore;

        let rows = store
            .mark_reviewed(
                &db,
                9999,
                ReviewDecision {
                    status: RegistrationStatus::Approved,
                    account_id: None,
                    reviewed_by: "staff-1".to_string(),
                    note: None,
                },
            )
            .await
            .expect("Failed to mark reviewed");
        assert_eq!(rows, 0);
    }
}
