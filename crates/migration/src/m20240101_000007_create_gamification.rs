//! Create `gamification` table.
//!
//! Each row is one point configuration; the service layer keeps at most one
//! row with `is_active = true`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gamification::Table)
                    .if_not_exists()
                    .col(uuid(Gamification::Id).primary_key())
                    .col(string_len(Gamification::Name, 128).not_null())
                    .col(integer(Gamification::PointsPerComment).default(0))
                    .col(integer(Gamification::PointsPerEvaluation).default(0))
                    .col(integer(Gamification::PointsPerService).default(0))
                    .col(boolean(Gamification::IsActive).default(false))
                    .col(uuid_null(Gamification::LastUpdatedBy))
                    .col(timestamp_with_time_zone(Gamification::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Gamification::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gamification_updater")
                            .from(Gamification::Table, Gamification::LastUpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Gamification::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Gamification { Table, Id, Name, PointsPerComment, PointsPerEvaluation, PointsPerService, IsActive, LastUpdatedBy, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
