//! Database migrations for site services

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_service_includes::Migration),
            Box::new(m20250301_000002_create_service_include_content::Migration),
        ]
    }
}

mod m20250301_000001_create_service_includes {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_service_includes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceIncludes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceIncludes::Id)
                                .string_len(64)
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ServiceIncludes::Label).string().not_null())
                        .col(
                            ColumnDef::new(ServiceIncludes::ServiceName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceIncludes::ServiceSettings)
                                .json()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceIncludes::Sitewide)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ServiceIncludes::ContentEditingEnabled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ServiceIncludes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(ServiceIncludes::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_service_includes_sitewide")
                        .table(ServiceIncludes::Table)
                        .col(ServiceIncludes::Sitewide)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceIncludes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ServiceIncludes {
        Table,
        Id,
        Label,
        ServiceName,
        ServiceSettings,
        Sitewide,
        ContentEditingEnabled,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_service_include_content {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_service_include_content"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceIncludeContent::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceIncludeContent::IncludeId)
                                .string_len(64)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceIncludeContent::ContentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceIncludeContent::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .primary_key(
                            Index::create()
                                .col(ServiceIncludeContent::IncludeId)
                                .col(ServiceIncludeContent::ContentId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_include_content_include")
                                .from(ServiceIncludeContent::Table, ServiceIncludeContent::IncludeId)
                                .to(ServiceIncludes::Table, ServiceIncludes::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Candidate lookup goes by content id
            manager
                .create_index(
                    Index::create()
                        .name("idx_service_include_content_content_id")
                        .table(ServiceIncludeContent::Table)
                        .col(ServiceIncludeContent::ContentId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceIncludeContent::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ServiceIncludeContent {
        Table,
        IncludeId,
        ContentId,
        Position,
    }

    #[derive(DeriveIden)]
    enum ServiceIncludes {
        Table,
        Id,
    }
}
