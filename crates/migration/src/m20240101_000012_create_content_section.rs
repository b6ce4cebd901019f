//! Create `content_section` table.
//!
//! About page, norms, privacy policy, terms and conditions and the user
//! manual share this table, discriminated by `kind`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentSection::Table)
                    .if_not_exists()
                    .col(uuid(ContentSection::Id).primary_key())
                    .col(string_len(ContentSection::Kind, 32).not_null())
                    .col(string_len(ContentSection::Title, 160).not_null())
                    .col(text(ContentSection::Body).not_null())
                    .col(integer(ContentSection::Position).default(0))
                    .col(uuid_null(ContentSection::LastUpdatedBy))
                    .col(timestamp_with_time_zone(ContentSection::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ContentSection::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_section_updater")
                            .from(ContentSection::Table, ContentSection::LastUpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContentSection::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContentSection { Table, Id, Kind, Title, Body, Position, LastUpdatedBy, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
