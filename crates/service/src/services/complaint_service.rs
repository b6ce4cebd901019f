use chrono::Utc;
use common::pagination::{PaginatedList, Pagination};
use models::complaint::{self, ComplaintState};
use models::{service, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::access::{Actor, Permission};
use crate::errors::ServiceError;
use crate::services::notification_service::Notifier;

#[derive(Clone, Debug, Deserialize)]
pub struct ComplaintInput {
    #[serde(default)]
    pub service_id: Option<Uuid>,
    #[serde(default)]
    pub target_user_id: Option<Uuid>,
    pub reason: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintOutcome {
    Resolve,
    Dismiss,
}

impl ComplaintOutcome {
    pub fn state(self) -> ComplaintState {
        match self {
            ComplaintOutcome::Resolve => ComplaintState::Resolved,
            ComplaintOutcome::Dismiss => ComplaintState::Dismissed,
        }
    }
}

pub async fn file(db: &DatabaseConnection, actor: &Actor, input: ComplaintInput) -> Result<complaint::Model, ServiceError> {
    complaint::validate_target(input.service_id, input.target_user_id)?;
    if let Some(service_id) = input.service_id {
        if service::Entity::find_by_id(service_id).one(db).await?.is_none() {
            return Err(ServiceError::Validation("service does not exist".into()));
        }
    }
    if let Some(target) = input.target_user_id {
        if target == actor.user_id {
            return Err(ServiceError::Validation("cannot complain about yourself".into()));
        }
        if user::Entity::find_by_id(target).one(db).await?.is_none() {
            return Err(ServiceError::Validation("user does not exist".into()));
        }
    }
    let created = complaint::create(db, actor.user_id, input.service_id, input.target_user_id, &input.reason).await?;
    info!(complaint_id = %created.id, "complaint_filed");
    Ok(created)
}

pub async fn list_mine(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<PaginatedList<complaint::Model>, ServiceError> {
    let rows = complaint::Entity::find()
        .filter(complaint::Column::ComplainantId.eq(actor.user_id))
        .order_by_desc(complaint::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(PaginatedList::create(rows, opts))
}

pub async fn list_all(db: &DatabaseConnection, actor: &Actor, state: Option<ComplaintState>, opts: Pagination) -> Result<PaginatedList<complaint::Model>, ServiceError> {
    actor.require(Permission::HandleComplaints)?;
    let mut query = complaint::Entity::find();
    if let Some(state) = state {
        query = query.filter(complaint::Column::State.eq(state));
    }
    let rows = query.order_by_desc(complaint::Column::CreatedAt).all(db).await?;
    Ok(PaginatedList::create(rows, opts))
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<complaint::Model, ServiceError> {
    let found = complaint::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("complaint"))?;
    actor.require_owner_or(found.complainant_id, Permission::HandleComplaints)?;
    Ok(found)
}

/// Resolve or dismiss a Pending complaint and tell the complainant.
pub async fn handle(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    id: Uuid,
    outcome: ComplaintOutcome,
    resolution: &str,
) -> Result<complaint::Model, ServiceError> {
    actor.require(Permission::HandleComplaints)?;
    models::errors::require_text("resolution", resolution, 2000)?;
    let found = complaint::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("complaint"))?;
    if found.state != ComplaintState::Pending {
        return Err(ServiceError::Conflict("complaint already handled".into()));
    }
    let complainant = found.complainant_id;
    let mut am: complaint::ActiveModel = found.into();
    am.state = Set(outcome.state());
    am.resolution = Set(Some(resolution.trim().to_string()));
    am.handled_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;

    let title = match outcome {
        ComplaintOutcome::Resolve => "Reclamação resolvida",
        ComplaintOutcome::Dismiss => "Reclamação arquivada",
    };
    notifier.notify(db, complainant, title, resolution.trim(), Some(format!("/complaints/{id}"))).await?;
    info!(complaint_id = %id, outcome = ?outcome, by = %actor.user_id, "complaint_handled");
    Ok(updated)
}

/// Complainant withdraws while Pending; handlers may delete any.
pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let found = get(db, actor, id).await?;
    if !actor.can(Permission::HandleComplaints) && found.state != ComplaintState::Pending {
        return Err(ServiceError::Conflict("complaint already handled".into()));
    }
    complaint::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::mailer::mock::RecordingMailer;
    use crate::test_support::{fixtures, mock_db, smtp_settings};
    use models::user::Role;

    #[tokio::test]
    async fn complaint_needs_a_target() {
        let db = mock_db().into_connection();
        let me = Actor::new(Uuid::new_v4(), Role::Cliente);
        let input = ComplaintInput { service_id: None, target_user_id: None, reason: "mau serviço".into() };
        assert!(matches!(file(&db, &me, input).await, Err(ServiceError::Model(_))));
    }

    #[tokio::test]
    async fn resolving_notifies_complainant() {
        let complainant = fixtures::user(Role::Cliente);
        let pending = fixtures::complaint(complainant.id, Some(Uuid::new_v4()));
        let resolved = complaint::Model { state: ComplaintState::Resolved, resolution: Some("Reembolsado".into()), ..pending.clone() };
        let db = mock_db()
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![resolved]])
            .append_query_results([vec![complainant.clone()]])
            .append_query_results([vec![fixtures::notification(complainant.id)]])
            .into_connection();
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = Notifier::new(mailer.clone(), smtp_settings());
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        let updated = handle(&db, &notifier, &moderator, pending.id, ComplaintOutcome::Resolve, "Reembolsado").await.unwrap();
        assert_eq!(updated.state, ComplaintState::Resolved);
        assert_eq!(mailer.sent()[0].to, complainant.email);
    }

    #[tokio::test]
    async fn handled_complaint_cannot_be_handled_again() {
        let done = complaint::Model { state: ComplaintState::Dismissed, ..fixtures::complaint(Uuid::new_v4(), None) };
        let db = mock_db().append_query_results([vec![done.clone()]]).into_connection();
        let notifier = Notifier::new(Arc::new(RecordingMailer::default()), smtp_settings());
        let admin = Actor::new(Uuid::new_v4(), Role::Administrador);
        let err = handle(&db, &notifier, &admin, done.id, ComplaintOutcome::Resolve, "x").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn providers_cannot_list_all() {
        let db = mock_db().into_connection();
        let provider = Actor::new(Uuid::new_v4(), Role::Prestador);
        assert!(list_all(&db, &provider, None, Pagination::default()).await.unwrap_err().is_hidden());
    }
}
