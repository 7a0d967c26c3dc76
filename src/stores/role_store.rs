use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::StoreError;
use crate::types::db::role::{self, Entity as RoleRow};
use crate::types::internal::{MenuId, Role};

/// Data access for the role registry.
pub struct RoleStore;

impl RoleStore {
    pub async fn get(
        &self,
        conn: &impl ConnectionTrait,
        role: Role,
    ) -> Result<Option<role::Model>, StoreError> {
        RoleRow::find_by_id(role.as_str())
            .one(conn)
            .await
            .map_err(|e| StoreError::database("find role", e))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<role::Model>, StoreError> {
        RoleRow::find()
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await
            .map_err(|e| StoreError::database("list roles", e))
    }

    /// Full replacement of one role's menu list. Returns the number of rows
    /// touched so callers can detect a missing role and abort their
    /// transaction.
    pub async fn set_menus(
        &self,
        conn: &impl ConnectionTrait,
        role: Role,
        menus: &[MenuId],
    ) -> Result<u64, StoreError> {
        let menus_json = serde_json::to_string(
            &menus.iter().map(|m| m.as_str()).collect::<Vec<_>>(),
        )
        .map_err(|e| StoreError::crypto("serialize menus", e.to_string()))?;

        let result = RoleRow::update_many()
            .col_expr(role::Column::Menus, Expr::value(menus_json))
            .col_expr(role::Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(role::Column::Name.eq(role.as_str()))
            .exec(conn)
            .await
            .map_err(|e| StoreError::database("update role menus", e))?;

        Ok(result.rows_affected)
    }
}

/// Decode a role row's JSON menu column. `None` means the column does not
/// hold a JSON string array; an empty list is a valid value and decodes as
/// such. Unknown identifiers are skipped rather than failing the whole row;
/// they cannot be stored through the API but may predate a catalogue change.
pub fn decode_menus(menus_json: &str) -> Option<Vec<MenuId>> {
    let raw: Vec<String> = serde_json::from_str(menus_json).ok()?;
    Some(raw.iter().filter_map(|s| s.parse().ok()).collect())
}
