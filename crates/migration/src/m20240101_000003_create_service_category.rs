//! Create `service_category` table.
//!
//! Self-referencing `parent_id` builds the category tree.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceCategory::Table)
                    .if_not_exists()
                    .col(uuid(ServiceCategory::Id).primary_key())
                    .col(string_len(ServiceCategory::Name, 128).not_null())
                    .col(text_null(ServiceCategory::Description))
                    .col(uuid_null(ServiceCategory::ParentId))
                    .col(uuid_null(ServiceCategory::LastUpdatedBy))
                    .col(timestamp_with_time_zone(ServiceCategory::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceCategory::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_category_parent")
                            .from(ServiceCategory::Table, ServiceCategory::ParentId)
                            .to(ServiceCategory::Table, ServiceCategory::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_category_updater")
                            .from(ServiceCategory::Table, ServiceCategory::LastUpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceCategory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceCategory { Table, Id, Name, Description, ParentId, LastUpdatedBy, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
