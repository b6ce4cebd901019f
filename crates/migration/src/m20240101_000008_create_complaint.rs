use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaint::Table)
                    .if_not_exists()
                    .col(uuid(Complaint::Id).primary_key())
                    .col(uuid(Complaint::ComplainantId).not_null())
                    .col(uuid_null(Complaint::ServiceId))
                    .col(uuid_null(Complaint::TargetUserId))
                    .col(text(Complaint::Reason).not_null())
                    .col(string_len(Complaint::State, 32).not_null())
                    .col(text_null(Complaint::Resolution))
                    .col(uuid_null(Complaint::HandledBy))
                    .col(timestamp_with_time_zone(Complaint::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Complaint::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_complainant")
                            .from(Complaint::Table, Complaint::ComplainantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_service")
                            .from(Complaint::Table, Complaint::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_target_user")
                            .from(Complaint::Table, Complaint::TargetUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Complaint::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Complaint { Table, Id, ComplainantId, ServiceId, TargetUserId, Reason, State, Resolution, HandledBy, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Service { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
