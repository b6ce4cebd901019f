use chrono::Utc;
use common::pagination::{PaginatedList, Pagination};
use models::comment_evaluation;
use models::service_requisition::{self, RequisitionStatus};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::access::{Actor, Permission};
use crate::errors::ServiceError;
use crate::gamification::actions_for_comment;
use crate::services::gamification_service;

#[derive(Clone, Debug, Deserialize)]
pub struct CommentInput {
    pub requisition_id: Uuid,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub evaluation: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommentEdit {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub evaluation: Option<i32>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RatingSummary {
    pub evaluations: usize,
    pub average: Option<f64>,
}

pub fn summarize(comments: &[comment_evaluation::Model]) -> RatingSummary {
    let scores: Vec<i32> = comments.iter().filter(|c| !c.is_removed).filter_map(|c| c.evaluation).collect();
    let average = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<i32>() as f64 / scores.len() as f64)
    };
    RatingSummary { evaluations: scores.len(), average }
}

/// First concluded requisition in `requisitions` that no comment points at.
pub fn first_uncommented<'a>(
    requisitions: &'a [service_requisition::Model],
    comments: &[comment_evaluation::Model],
) -> Option<&'a service_requisition::Model> {
    requisitions
        .iter()
        .filter(|r| r.status == RequisitionStatus::Concluded)
        .find(|r| !comments.iter().any(|c| c.requisition_id == r.id))
}

/// The requisition the caller may still comment on for this service, if any.
pub async fn commentable_requisition(db: &DatabaseConnection, actor: &Actor, service_id: Uuid) -> Result<Option<service_requisition::Model>, ServiceError> {
    let requisitions = service_requisition::Entity::find()
        .filter(service_requisition::Column::ServiceId.eq(service_id))
        .filter(service_requisition::Column::RequisitionerId.eq(actor.user_id))
        .filter(service_requisition::Column::Status.eq(RequisitionStatus::Concluded))
        .order_by_asc(service_requisition::Column::ConclusionDate)
        .all(db)
        .await?;
    if requisitions.is_empty() {
        return Ok(None);
    }
    let comments = comment_evaluation::Entity::find()
        .filter(comment_evaluation::Column::ServiceId.eq(service_id))
        .filter(comment_evaluation::Column::AuthorId.eq(actor.user_id))
        .all(db)
        .await?;
    Ok(first_uncommented(&requisitions, &comments).cloned())
}

/// Comment on a concluded requisition the caller made, awarding points in the same transaction.
#[instrument(skip(db, input), fields(actor = %actor.user_id, requisition_id = %input.requisition_id))]
pub async fn create(db: &DatabaseConnection, actor: &Actor, input: CommentInput) -> Result<comment_evaluation::Model, ServiceError> {
    comment_evaluation::validate_content(input.comment.as_deref(), input.evaluation)?;
    let requisition = service_requisition::Entity::find_by_id(input.requisition_id)
        .one(db)
        .await?
        .filter(|r| r.requisitioner_id == actor.user_id && r.status == RequisitionStatus::Concluded)
        .ok_or_else(|| ServiceError::not_found("requisition"))?;
    let existing = comment_evaluation::Entity::find()
        .filter(comment_evaluation::Column::RequisitionId.eq(requisition.id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("requisition already has a comment".into()));
    }

    let txn = db.begin().await?;
    let created = comment_evaluation::create(&txn, requisition.service_id, actor.user_id, requisition.id, input.comment, input.evaluation).await?;
    let actions = actions_for_comment(created.comment.is_some(), created.evaluation.is_some());
    let points = gamification_service::award_for(&txn, actor.user_id, &actions).await?;
    txn.commit().await?;
    info!(comment_id = %created.id, points, "comment_created");
    Ok(created)
}

pub async fn list_for_service(db: &DatabaseConnection, service_id: Uuid, opts: Pagination) -> Result<(RatingSummary, PaginatedList<comment_evaluation::Model>), ServiceError> {
    let rows = comment_evaluation::Entity::find()
        .filter(comment_evaluation::Column::ServiceId.eq(service_id))
        .filter(comment_evaluation::Column::IsRemoved.eq(false))
        .order_by_desc(comment_evaluation::Column::CreatedAt)
        .all(db)
        .await?;
    let summary = summarize(&rows);
    Ok((summary, PaginatedList::create(rows, opts)))
}

async fn find_visible(db: &DatabaseConnection, id: Uuid) -> Result<comment_evaluation::Model, ServiceError> {
    comment_evaluation::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|c| !c.is_removed)
        .ok_or_else(|| ServiceError::not_found("comment"))
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<comment_evaluation::Model, ServiceError> {
    find_visible(db, id).await
}

/// Author edits text or score. Points are not re-awarded.
pub async fn update(db: &DatabaseConnection, actor: &Actor, id: Uuid, edit: CommentEdit) -> Result<comment_evaluation::Model, ServiceError> {
    let found = find_visible(db, id).await?;
    if found.author_id != actor.user_id {
        return Err(ServiceError::Forbidden("comments are edited by their author".into()));
    }
    comment_evaluation::validate_content(edit.comment.as_deref(), edit.evaluation)?;
    let mut am: comment_evaluation::ActiveModel = found.into();
    am.comment = Set(edit.comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()));
    am.evaluation = Set(edit.evaluation);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Soft-remove by the author or a comment moderator.
pub async fn remove(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let found = find_visible(db, id).await?;
    actor.require_owner_or(found.author_id, Permission::ModerateComments)?;
    let mut am: comment_evaluation::ActiveModel = found.into();
    am.is_removed = Set(true);
    am.removed_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    info!(comment_id = %id, by = %actor.user_id, "comment_removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixtures, mock_db};
    use models::user::Role;
    use sea_orm::MockExecResult;

    #[test]
    fn summary_ignores_removed_and_text_only() {
        let req = fixtures::requisition(Uuid::new_v4(), Uuid::new_v4(), RequisitionStatus::Concluded);
        let removed = comment_evaluation::Model { is_removed: true, ..fixtures::comment(&req, None, Some(1)) };
        let rows = vec![fixtures::comment(&req, None, Some(4)), fixtures::comment(&req, Some("ok"), Some(5)), fixtures::comment(&req, Some("só texto"), None), removed];
        let summary = summarize(&rows);
        assert_eq!(summary.evaluations, 2);
        assert_eq!(summary.average, Some(4.5));
        assert_eq!(summarize(&[]).average, None);
    }

    #[test]
    fn uncommented_requisition_lookup() {
        let client = Uuid::new_v4();
        let service_id = Uuid::new_v4();
        let done = fixtures::requisition(service_id, client, RequisitionStatus::Concluded);
        let done_again = fixtures::requisition(service_id, client, RequisitionStatus::Concluded);
        let pending = fixtures::requisition(service_id, client, RequisitionStatus::Pending);
        let comments = vec![fixtures::comment(&done, Some("bom"), None)];
        let reqs = vec![pending, done, done_again.clone()];
        assert_eq!(first_uncommented(&reqs, &comments).map(|r| r.id), Some(done_again.id));
        assert!(first_uncommented(&reqs[..2], &comments).is_none());
    }

    #[tokio::test]
    async fn comment_requires_concluded_requisition() {
        let client = Uuid::new_v4();
        let req = fixtures::requisition(Uuid::new_v4(), client, RequisitionStatus::Accepted);
        let db = mock_db().append_query_results([vec![req.clone()]]).into_connection();
        let input = CommentInput { requisition_id: req.id, comment: Some("Excelente".into()), evaluation: None };
        let err = create(&db, &Actor::new(client, Role::Cliente), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn comment_with_evaluation_earns_both_values() {
        let client = Uuid::new_v4();
        let req = fixtures::requisition(Uuid::new_v4(), client, RequisitionStatus::Concluded);
        let stored = fixtures::comment(&req, Some("Excelente"), Some(5));
        let db = mock_db()
            .append_query_results([vec![req.clone()]])
            .append_query_results([Vec::<comment_evaluation::Model>::new()])
            .append_query_results([vec![stored.clone()]])
            .append_query_results([vec![fixtures::gamification(true, 2, 3, 0)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();
        let input = CommentInput { requisition_id: req.id, comment: Some("Excelente".into()), evaluation: Some(5) };
        let created = create(&db, &Actor::new(client, Role::Cliente), input).await.unwrap();
        assert_eq!(created.id, stored.id);
        assert!(crate::metrics::POINTS_AWARDED_TOTAL.get() >= 5);
        let log = db.into_transaction_log();
        let txn = format!("{:?}", log.last().unwrap());
        assert!(txn.contains("comment_evaluation") && txn.contains("total_points"));
    }

    #[tokio::test]
    async fn second_comment_conflicts() {
        let client = Uuid::new_v4();
        let req = fixtures::requisition(Uuid::new_v4(), client, RequisitionStatus::Concluded);
        let db = mock_db()
            .append_query_results([vec![req.clone()]])
            .append_query_results([vec![fixtures::comment(&req, Some("já"), None)]])
            .into_connection();
        let input = CommentInput { requisition_id: req.id, comment: None, evaluation: Some(3) };
        let err = create(&db, &Actor::new(client, Role::Cliente), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn stranger_cannot_remove_but_moderator_can() {
        let req = fixtures::requisition(Uuid::new_v4(), Uuid::new_v4(), RequisitionStatus::Concluded);
        let comment = fixtures::comment(&req, Some("spam"), None);
        let db = mock_db().append_query_results([vec![comment.clone()]]).into_connection();
        let stranger = Actor::new(Uuid::new_v4(), Role::Prestador);
        assert!(remove(&db, &stranger, comment.id).await.unwrap_err().is_hidden());

        let removed = comment_evaluation::Model { is_removed: true, ..comment.clone() };
        let db = mock_db()
            .append_query_results([vec![comment.clone()]])
            .append_query_results([vec![removed]])
            .into_connection();
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        remove(&db, &moderator, comment.id).await.unwrap();
    }
}
