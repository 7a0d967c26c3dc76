use poem_openapi::{payload::Json, OpenApi, Tags};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::{verify_bearer, AuthenticatedUser, BearerAuth};
use crate::errors::role::RoleError;
use crate::errors::StoreError;
use crate::services::TokenService;
use crate::stores::{decode_menus, RoleStore};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::role::{RoleListResponse, RoleView, UpdateMenuAccessRequest};
use crate::types::internal::{parse_menus, MenuId, Role};

/// Role registry API endpoints
pub struct RoleApi {
    db: DatabaseConnection,
    tokens: Arc<TokenService>,
    roles: RoleStore,
}

impl RoleApi {
    pub fn new(db: DatabaseConnection, tokens: Arc<TokenService>, roles: RoleStore) -> Self {
        Self { db, tokens, roles }
    }

    fn require_staff(&self, auth: &BearerAuth) -> Result<AuthenticatedUser, RoleError> {
        let user = verify_bearer(&self.tokens, auth).map_err(|_| RoleError::unauthorized())?;

        if !user.role.is_staff() {
            return Err(RoleError::forbidden());
        }

        Ok(user)
    }
}

/// API tags for role endpoints
#[derive(Tags)]
enum RoleTags {
    /// Role and menu-access endpoints
    Roles,
}

#[OpenApi]
impl RoleApi {
    /// List all roles with their menu access
    #[oai(path = "/roles", method = "get", tag = "RoleTags::Roles")]
    async fn list(&self, auth: BearerAuth) -> Result<Json<RoleListResponse>, RoleError> {
        self.require_staff(&auth)?;

        let roles = self
            .roles
            .list(&self.db)
            .await?
            .into_iter()
            .map(|model| RoleView {
                menus: decode_menus(&model.menus)
                    .unwrap_or_default()
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
                name: model.name,
                display_name: model.display_name,
                description: model.description,
                is_active: model.is_active,
            })
            .collect();

        Ok(Json(RoleListResponse { roles }))
    }

    /// Replace menu access for a batch of roles
    ///
    /// The whole batch is validated up front and applied in one
    /// transaction; one bad entry means nothing changes.
    #[oai(path = "/roles", method = "put", tag = "RoleTags::Roles")]
    async fn update_menu_access(
        &self,
        auth: BearerAuth,
        body: Json<UpdateMenuAccessRequest>,
    ) -> Result<Json<MessageResponse>, RoleError> {
        let caller = self.require_staff(&auth)?;

        if body.roles.is_empty() {
            return Err(RoleError::validation("batch must not be empty"));
        }

        let mut updates: Vec<(Role, Vec<MenuId>)> = Vec::with_capacity(body.roles.len());
        for entry in &body.roles {
            let role = entry
                .role
                .parse::<Role>()
                .map_err(|_| RoleError::not_found(&entry.role))?;
            let menus = parse_menus(&entry.menus)
                .map_err(|e| RoleError::validation(e.to_string()))?;
            updates.push((role, menus));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::database("begin menu update transaction", e))?;

        for (role, menus) in &updates {
            let rows = self.roles.set_menus(&txn, *role, menus).await?;
            if rows != 1 {
                // Registry row missing from the table; abort the batch.
                return Err(RoleError::not_found(role.as_str()));
            }
        }

        txn.commit()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to commit menu update transaction");
                StoreError::database("commit menu update transaction", e)
            })?;

        info!(
            updated_by = %caller.user_id,
            roles = updates.len(),
            "Menu access updated"
        );

        Ok(Json(MessageResponse {
            message: "Menu access updated".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dto::role::RoleMenuUpdate;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    async fn setup_api() -> RoleApi {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        RoleApi::new(
            db,
            Arc::new(TokenService::new("test-jwt-secret-32-characters-min".to_string())),
            RoleStore,
        )
    }

    fn bearer(api: &RoleApi, role: Role) -> BearerAuth {
        let token = api.tokens.generate_jwt("user-1", role).unwrap();
        BearerAuth(Bearer { token })
    }

    fn menus_of<'a>(response: &'a RoleListResponse, name: &str) -> &'a [String] {
        &response
            .roles
            .iter()
            .find(|r| r.name == name)
            .expect("Role missing from listing")
            .menus
    }

    #[tokio::test]
    async fn test_list_returns_seeded_roles() {
        let api = setup_api().await;

        let response = api.list(bearer(&api, Role::Admin)).await.unwrap();

        assert_eq!(response.0.roles.len(), 4);
        assert_eq!(
            menus_of(&response.0, "teacher"),
            &["home", "formulir-list", "portofolio"]
        );
    }

    #[tokio::test]
    async fn test_batch_update_applies_all_entries() {
        let api = setup_api().await;

        api.update_menu_access(
            bearer(&api, Role::Admin),
            Json(UpdateMenuAccessRequest {
                roles: vec![
                    RoleMenuUpdate {
                        role: "teacher".to_string(),
                        menus: vec!["home".to_string()],
                    },
                    RoleMenuUpdate {
                        role: "parent".to_string(),
                        menus: vec!["home".to_string(), "portofolio".to_string()],
                    },
                ],
            }),
        )
        .await
        .unwrap();

        let response = api.list(bearer(&api, Role::Admin)).await.unwrap();
        assert_eq!(menus_of(&response.0, "teacher"), &["home"]);
        assert_eq!(menus_of(&response.0, "parent"), &["home", "portofolio"]);
    }

    #[tokio::test]
    async fn test_unknown_menu_rejects_whole_batch() {
        let api = setup_api().await;

        let result = api
            .update_menu_access(
                bearer(&api, Role::Admin),
                Json(UpdateMenuAccessRequest {
                    roles: vec![
                        RoleMenuUpdate {
                            role: "teacher".to_string(),
                            menus: vec!["home".to_string()],
                        },
                        RoleMenuUpdate {
                            role: "parent".to_string(),
                            menus: vec!["not-a-menu".to_string()],
                        },
                    ],
                }),
            )
            .await;

        assert!(matches!(result, Err(RoleError::Validation(_))));

        // The valid first entry was not applied either
        let response = api.list(bearer(&api, Role::Admin)).await.unwrap();
        assert_eq!(
            menus_of(&response.0, "teacher"),
            &["home", "formulir-list", "portofolio"]
        );
    }

    #[tokio::test]
    async fn test_unknown_role_rejects_whole_batch() {
        let api = setup_api().await;

        let result = api
            .update_menu_access(
                bearer(&api, Role::Admin),
                Json(UpdateMenuAccessRequest {
                    roles: vec![RoleMenuUpdate {
                        role: "principal".to_string(),
                        menus: vec!["home".to_string()],
                    }],
                }),
            )
            .await;

        assert!(matches!(result, Err(RoleError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let api = setup_api().await;

        let result = api
            .update_menu_access(
                bearer(&api, Role::Admin),
                Json(UpdateMenuAccessRequest { roles: vec![] }),
            )
            .await;

        assert!(matches!(result, Err(RoleError::Validation(_))));
    }

    #[tokio::test]
    async fn test_parent_cannot_touch_roles() {
        let api = setup_api().await;

        let result = api.list(bearer(&api, Role::Parent)).await;
        assert!(matches!(result, Err(RoleError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let api = setup_api().await;

        let auth = BearerAuth(Bearer {
            token: "garbage".to_string(),
        });
        let result = api.list(auth).await;
        assert!(matches!(result, Err(RoleError::Unauthorized(_))));
    }
}
