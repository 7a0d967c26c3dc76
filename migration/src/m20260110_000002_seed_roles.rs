use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Seeded menu lists mirror the per-role defaults the dashboard falls back to
// when the registry is unreachable.
const SEED_ROLES: &[(&str, &str, &str, &str)] = &[
    (
        "admin",
        "Administrator",
        "Full access to every dashboard section",
        r#"["home","registrations","formulir-list","formulir","portofolio","users","roles","coupons","menu","settings"]"#,
    ),
    (
        "staff",
        "Admissions Staff",
        "Handles registrations and form intake",
        r#"["home","registrations","formulir-list","formulir","portofolio","users","coupons","menu"]"#,
    ),
    (
        "teacher",
        "Teacher",
        "Views submitted forms and student portfolios",
        r#"["home","formulir-list","portofolio"]"#,
    ),
    (
        "parent",
        "Parent / Guardian",
        "Fills forms and follows their child's portfolio",
        r#"["home","formulir","portofolio"]"#,
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, display_name, description, menus) in SEED_ROLES {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Roles::Table)
                        .columns([
                            Roles::Name,
                            Roles::DisplayName,
                            Roles::Description,
                            Roles::Menus,
                            Roles::IsActive,
                            Roles::UpdatedAt,
                        ])
                        .values_panic([
                            (*name).into(),
                            (*display_name).into(),
                            (*description).into(),
                            (*menus).into(),
                            true.into(),
                            0.into(),
                        ])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, _, _, _) in SEED_ROLES {
            manager
                .exec_stmt(
                    Query::delete()
                        .from_table(Roles::Table)
                        .and_where(Expr::col(Roles::Name).eq(*name))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Name,
    DisplayName,
    Description,
    Menus,
    IsActive,
    UpdatedAt,
}
