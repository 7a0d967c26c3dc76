use sea_orm::ConnectionTrait;
use tracing::warn;

use crate::stores::{decode_menus, RoleStore};
use crate::types::internal::{MenuId, Role};

/// Resolves which dashboard menus a role may see.
///
/// Menu lists live in the roles table so staff can adjust access at
/// runtime, including revoking every menu. When the stored row is missing,
/// inactive, or unreadable the filter falls back to a built-in default so a
/// broken registry never locks out the dashboard.
pub struct MenuFilter {
    roles: RoleStore,
}

impl MenuFilter {
    pub fn new(roles: RoleStore) -> Self {
        Self { roles }
    }

    /// Built-in menu access per role, mirroring the seed data.
    pub fn default_menus(role: Role) -> Vec<MenuId> {
        match role {
            Role::Admin => MenuId::ALL.to_vec(),
            Role::Staff => vec![
                MenuId::Home,
                MenuId::Registrations,
                MenuId::FormulirList,
                MenuId::Formulir,
                MenuId::Portofolio,
                MenuId::Users,
                MenuId::Coupons,
                MenuId::Menu,
            ],
            Role::Teacher => vec![MenuId::Home, MenuId::FormulirList, MenuId::Portofolio],
            Role::Parent => vec![MenuId::Home, MenuId::Formulir, MenuId::Portofolio],
        }
    }

    /// Menus the given role can access, in catalogue order.
    pub async fn accessible_menus(&self, conn: &impl ConnectionTrait, role: Role) -> Vec<MenuId> {
        let stored = match self.roles.get(conn, role).await {
            Ok(Some(model)) => model,
            Ok(None) => {
                warn!(role = %role, "Role row missing from registry, using defaults");
                return Self::default_menus(role);
            }
            Err(e) => {
                warn!(role = %role, error = %e, "Failed to load role menus, using defaults");
                return Self::default_menus(role);
            }
        };

        if !stored.is_active {
            return Self::default_menus(role);
        }

        // A stored empty list is a deliberate revocation and stays empty;
        // only an unreadable column falls back.
        let menus = match decode_menus(&stored.menus) {
            Some(menus) => menus,
            None => {
                warn!(role = %role, "Stored menu list is not valid JSON, using defaults");
                return Self::default_menus(role);
            }
        };

        // Catalogue order keeps the dashboard stable regardless of how
        // the stored list was edited.
        MenuId::ALL
            .iter()
            .copied()
            .filter(|m| menus.contains(m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_seeded_menus_are_returned() {
        let db = setup_db().await;
        let filter = MenuFilter::new(RoleStore);

        let menus = filter.accessible_menus(&db, Role::Teacher).await;
        assert_eq!(
            menus,
            vec![MenuId::Home, MenuId::FormulirList, MenuId::Portofolio]
        );
    }

    #[tokio::test]
    async fn test_admin_sees_every_menu() {
        let db = setup_db().await;
        let filter = MenuFilter::new(RoleStore);

        let menus = filter.accessible_menus(&db, Role::Admin).await;
        assert_eq!(menus, MenuId::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_updated_menus_take_effect() {
        let db = setup_db().await;
        let filter = MenuFilter::new(RoleStore);

        RoleStore
            .set_menus(&db, Role::Parent, &[MenuId::Home])
            .await
            .unwrap();

        let menus = filter.accessible_menus(&db, Role::Parent).await;
        assert_eq!(menus, vec![MenuId::Home]);
    }

    #[tokio::test]
    async fn test_revoking_every_menu_leaves_dashboard_empty() {
        let db = setup_db().await;
        let filter = MenuFilter::new(RoleStore);

        RoleStore
            .set_menus(&db, Role::Teacher, &[])
            .await
            .unwrap();

        let menus = filter.accessible_menus(&db, Role::Teacher).await;
        assert!(menus.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_stored_menus_fall_back_to_defaults() {
        let db = setup_db().await;
        let filter = MenuFilter::new(RoleStore);

        db.execute_unprepared("UPDATE roles SET menus = 'not json' WHERE name = 'parent'")
            .await
            .unwrap();

        let menus = filter.accessible_menus(&db, Role::Parent).await;
        assert_eq!(menus, MenuFilter::default_menus(Role::Parent));
    }

    #[tokio::test]
    async fn test_inactive_role_falls_back_to_defaults() {
        let db = setup_db().await;
        let filter = MenuFilter::new(RoleStore);

        db.execute_unprepared("UPDATE roles SET is_active = 0, menus = '[\"home\"]' WHERE name = 'staff'")
            .await
            .unwrap();

        let menus = filter.accessible_menus(&db, Role::Staff).await;
        assert_eq!(menus, MenuFilter::default_menus(Role::Staff));
    }
}
