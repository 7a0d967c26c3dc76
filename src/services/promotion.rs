use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::errors::StoreError;
use crate::services::account_resolver::{AccountOutcome, AccountResolver};
use crate::services::mailer::{send_best_effort, Mailer, OutboundEmail};
use crate::stores::{NewRegistration, RegistrationStore, ReviewDecision};
use crate::types::db::registration::{self, RegistrationStatus};
use crate::types::internal::Role;

#[derive(Error, Debug)]
pub enum PromotionError {
    #[error("registration not found")]
    NotFound,

    #[error("registration has already been reviewed")]
    NotPending,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives a registration from submission through staff review.
///
/// Approval with account creation and the status transition commit
/// together or not at all; notification emails go out only after the
/// transaction has committed.
pub struct PromotionService {
    db: DatabaseConnection,
    registrations: RegistrationStore,
    resolver: AccountResolver,
    mailer: Arc<dyn Mailer>,
}

impl PromotionService {
    pub fn new(
        db: DatabaseConnection,
        registrations: RegistrationStore,
        resolver: AccountResolver,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            registrations,
            resolver,
            mailer,
        }
    }

    /// Record a new registration in the pending state.
    pub async fn submit(&self, new: NewRegistration) -> Result<registration::Model, PromotionError> {
        let created = self.registrations.insert(&self.db, new).await?;
        info!(registration_id = created.id, "Registration submitted");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<registration::Model>, PromotionError> {
        Ok(self.registrations.list(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<registration::Model, PromotionError> {
        self.registrations
            .find_by_id(&self.db, id)
            .await?
            .ok_or(PromotionError::NotFound)
    }

    /// Approve a pending registration, optionally resolving a parent
    /// account for the guardian in the same transaction.
    pub async fn approve(
        &self,
        id: i32,
        reviewed_by: &str,
        create_account: bool,
        note: Option<String>,
    ) -> Result<Option<AccountOutcome>, PromotionError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::database("begin approval transaction", e))?;

        let reg = self
            .registrations
            .find_by_id(&txn, id)
            .await?
            .ok_or(PromotionError::NotFound)?;

        if reg.status != RegistrationStatus::Pending {
            return Err(PromotionError::NotPending);
        }

        let resolved = if create_account {
            Some(
                self.resolver
                    .resolve(&txn, &reg.guardian_email, &reg.guardian_name, Role::Parent)
                    .await?,
            )
        } else {
            None
        };

        let decision = ReviewDecision {
            status: RegistrationStatus::Approved,
            account_id: resolved.as_ref().map(|r| r.user_id.clone()),
            reviewed_by: reviewed_by.to_string(),
            note,
        };

        let rows = self.registrations.mark_reviewed(&txn, id, decision).await?;
        if rows != 1 {
            // Another reviewer moved the row out of pending first; the
            // transaction (and any account work) rolls back on drop.
            return Err(PromotionError::NotPending);
        }

        txn.commit()
            .await
            .map_err(|e| StoreError::database("commit approval transaction", e))?;

        let outcome = resolved.as_ref().map(|r| r.outcome);
        info!(
            registration_id = id,
            reviewed_by = reviewed_by,
            account_outcome = outcome.map(|o| o.as_str()).unwrap_or("none"),
            "Registration approved"
        );

        send_best_effort(
            self.mailer.as_ref(),
            OutboundEmail::RegistrationDecision {
                to: reg.guardian_email.clone(),
                child_name: reg.child_name.clone(),
                approved: true,
            },
        )
        .await;

        if let Some(resolved) = resolved {
            if let Some(generated_password) = resolved.generated_password {
                send_best_effort(
                    self.mailer.as_ref(),
                    OutboundEmail::AccountCreated {
                        to: reg.guardian_email,
                        display_name: reg.guardian_name,
                        generated_password,
                    },
                )
                .await;
            }
        }

        Ok(outcome)
    }

    /// Reject a pending registration. Never touches accounts.
    pub async fn reject(
        &self,
        id: i32,
        reviewed_by: &str,
        note: Option<String>,
    ) -> Result<(), PromotionError> {
        let reg = self
            .registrations
            .find_by_id(&self.db, id)
            .await?
            .ok_or(PromotionError::NotFound)?;

        if reg.status != RegistrationStatus::Pending {
            return Err(PromotionError::NotPending);
        }

        let decision = ReviewDecision {
            status: RegistrationStatus::Rejected,
            account_id: None,
            reviewed_by: reviewed_by.to_string(),
            note,
        };

        let rows = self.registrations.mark_reviewed(&self.db, id, decision).await?;
        if rows != 1 {
            return Err(PromotionError::NotPending);
        }

        info!(registration_id = id, reviewed_by = reviewed_by, "Registration rejected");

        send_best_effort(
            self.mailer.as_ref(),
            OutboundEmail::RegistrationDecision {
                to: reg.guardian_email,
                child_name: reg.child_name,
                approved: false,
            },
        )
        .await;

        Ok(())
    }
}
