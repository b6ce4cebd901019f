//! Create `service_requisition` table.
//!
//! `status` holds the workflow state as text; `conclusion_date` is only set
//! when the provider concludes an accepted requisition.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRequisition::Table)
                    .if_not_exists()
                    .col(uuid(ServiceRequisition::Id).primary_key())
                    .col(uuid(ServiceRequisition::ServiceId).not_null())
                    .col(uuid(ServiceRequisition::RequisitionerId).not_null())
                    .col(string_len(ServiceRequisition::Status, 32).not_null())
                    .col(text_null(ServiceRequisition::AdditionalInfo))
                    .col(timestamp_with_time_zone(ServiceRequisition::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceRequisition::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(ServiceRequisition::ConclusionDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requisition_service")
                            .from(ServiceRequisition::Table, ServiceRequisition::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requisition_user")
                            .from(ServiceRequisition::Table, ServiceRequisition::RequisitionerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceRequisition::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceRequisition { Table, Id, ServiceId, RequisitionerId, Status, AdditionalInfo, CreatedAt, UpdatedAt, ConclusionDate }

#[derive(DeriveIden)]
enum Service { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
