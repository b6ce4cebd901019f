use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Formation::Table)
                    .if_not_exists()
                    .col(uuid(Formation::Id).primary_key())
                    .col(string_len(Formation::Title, 160).not_null())
                    .col(text(Formation::Description).not_null())
                    .col(string_len(Formation::Location, 255).not_null())
                    .col(timestamp_with_time_zone(Formation::StartsAt).not_null())
                    .col(integer(Formation::DurationMinutes).not_null())
                    .col(integer(Formation::Capacity).not_null())
                    .col(uuid_null(Formation::LastUpdatedBy))
                    .col(timestamp_with_time_zone(Formation::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Formation::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_formation_updater")
                            .from(Formation::Table, Formation::LastUpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Formation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Formation { Table, Id, Title, Description, Location, StartsAt, DurationMinutes, Capacity, LastUpdatedBy, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
