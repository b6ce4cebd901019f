use sea_orm_migration::prelude::*;

/// At most one gamification row may be active at a time.
pub(crate) const SINGLE_ACTIVE_GAMIFICATION: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS uniq_gamification_single_active ON gamification (is_active) WHERE is_active";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: provider and category lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_service_provider")
                    .table(Service::Table)
                    .col(Service::ProviderId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_category")
                    .table(Service::Table)
                    .col(Service::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Requisitions: by service and by requisitioner
        manager
            .create_index(
                Index::create()
                    .name("idx_requisition_service")
                    .table(ServiceRequisition::Table)
                    .col(ServiceRequisition::ServiceId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_requisition_requisitioner")
                    .table(ServiceRequisition::Table)
                    .col(ServiceRequisition::RequisitionerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_service")
                    .table(CommentEvaluation::Table)
                    .col(CommentEvaluation::ServiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .to_owned(),
            )
            .await?;

        // Enrollment: one seat per user per formation
        manager
            .create_index(
                Index::create()
                    .name("uniq_enrollment_formation_user")
                    .table(Enrollment::Table)
                    .col(Enrollment::FormationId)
                    .col(Enrollment::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_section_kind")
                    .table(ContentSection::Table)
                    .col(ContentSection::Kind)
                    .col(ContentSection::Position)
                    .to_owned(),
            )
            .await?;

        // Partial index; the builder has no WHERE clause for indexes
        manager.get_connection().execute_unprepared(SINGLE_ACTIVE_GAMIFICATION).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_provider").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_category").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_requisition_service").table(ServiceRequisition::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_requisition_requisitioner").table(ServiceRequisition::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comment_service").table(CommentEvaluation::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notification_user").table(Notification::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_enrollment_formation_user").table(Enrollment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_content_section_kind").table(ContentSection::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_gamification_single_active").table(Gamification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Gamification { Table }

#[derive(DeriveIden)]
enum Service { Table, ProviderId, CategoryId }

#[derive(DeriveIden)]
enum ServiceRequisition { Table, ServiceId, RequisitionerId }

#[derive(DeriveIden)]
enum CommentEvaluation { Table, ServiceId }

#[derive(DeriveIden)]
enum Notification { Table, UserId }

#[derive(DeriveIden)]
enum Enrollment { Table, FormationId, UserId }

#[derive(DeriveIden)]
enum ContentSection { Table, Kind, Position }
