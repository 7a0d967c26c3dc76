use sea_orm::ConnectionTrait;
use tracing::info;

use crate::errors::StoreError;
use crate::services::crypto;
use crate::stores::UserStore;
use crate::types::internal::Role;

/// What happened when an account was resolved for a guardian email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOutcome {
    /// No account existed, one was created with a generated password.
    Created,
    /// An account existed with a lower-ranked role and was upgraded.
    RoleUpgraded,
    /// An account existed with the desired role or a higher one.
    AlreadySatisfied,
}

impl AccountOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountOutcome::Created => "created",
            AccountOutcome::RoleUpgraded => "role_upgraded",
            AccountOutcome::AlreadySatisfied => "already_satisfied",
        }
    }
}

/// The resolved account plus the credential to hand to the guardian,
/// if one was generated. The plaintext password lives only long enough
/// to be emailed after the surrounding transaction commits.
pub struct ResolvedAccount {
    pub user_id: String,
    pub outcome: AccountOutcome,
    pub generated_password: Option<String>,
}

/// Ensures a guardian email maps to a usable account of at least the
/// desired role. Idempotent by email: resolving twice never creates a
/// duplicate account and never downgrades an existing role.
pub struct AccountResolver {
    users: UserStore,
}

impl AccountResolver {
    pub fn new(users: UserStore) -> Self {
        Self { users }
    }

    pub async fn resolve(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        display_name: &str,
        desired_role: Role,
    ) -> Result<ResolvedAccount, StoreError> {
        if let Some(existing) = self.users.find_by_email(conn, email).await? {
            // A stored role outside the registry cannot outrank anything,
            // so it is always upgradeable.
            let keeps_current = existing
                .role
                .parse::<Role>()
                .map(|current| current.rank() >= desired_role.rank())
                .unwrap_or(false);

            if keeps_current {
                return Ok(ResolvedAccount {
                    user_id: existing.id,
                    outcome: AccountOutcome::AlreadySatisfied,
                    generated_password: None,
                });
            }

            self.users.set_role(conn, &existing.id, desired_role).await?;
            info!(user_id = %existing.id, role = %desired_role, "Upgraded account role");

            return Ok(ResolvedAccount {
                user_id: existing.id,
                outcome: AccountOutcome::RoleUpgraded,
                generated_password: None,
            });
        }

        let generated_password = crypto::generate_password();
        let password_hash = crypto::hash_password(&generated_password)?;

        let created = self
            .users
            .insert(conn, email, display_name, desired_role, &password_hash)
            .await?;
        info!(user_id = %created.id, role = %desired_role, "Created account for guardian");

        Ok(ResolvedAccount {
            user_id: created.id,
            outcome: AccountOutcome::Created,
            generated_password: Some(generated_password),
        })
    }
}
