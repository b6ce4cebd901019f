use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommentEvaluation::Table)
                    .if_not_exists()
                    .col(uuid(CommentEvaluation::Id).primary_key())
                    .col(uuid(CommentEvaluation::ServiceId).not_null())
                    .col(uuid(CommentEvaluation::AuthorId).not_null())
                    .col(uuid(CommentEvaluation::RequisitionId).unique_key().not_null())
                    .col(text_null(CommentEvaluation::Comment))
                    .col(integer_null(CommentEvaluation::Evaluation))
                    .col(boolean(CommentEvaluation::IsRemoved).default(false))
                    .col(uuid_null(CommentEvaluation::RemovedBy))
                    .col(timestamp_with_time_zone(CommentEvaluation::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CommentEvaluation::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_service")
                            .from(CommentEvaluation::Table, CommentEvaluation::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_author")
                            .from(CommentEvaluation::Table, CommentEvaluation::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_requisition")
                            .from(CommentEvaluation::Table, CommentEvaluation::RequisitionId)
                            .to(ServiceRequisition::Table, ServiceRequisition::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CommentEvaluation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CommentEvaluation { Table, Id, ServiceId, AuthorId, RequisitionId, Comment, Evaluation, IsRemoved, RemovedBy, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Service { Table, Id }

#[derive(DeriveIden)]
enum ServiceRequisition { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
