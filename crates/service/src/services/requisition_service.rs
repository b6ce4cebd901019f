//! Requisition lifecycle against the database, driven by [`crate::requisition`].

use chrono::Utc;
use common::pagination::{PaginatedList, Pagination};
use models::service_requisition::{self, RequisitionStatus};
use models::{service, user};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::access::Actor;
use crate::errors::ServiceError;
use crate::metrics::REQUISITION_TRANSITIONS_TOTAL;
use crate::requisition::{next_status, notification_text, required_party, Party, RequisitionEvent, TransitionError};
use crate::services::notification_service::Notifier;

#[derive(Clone, Debug, Deserialize)]
pub struct RequisitionInput {
    pub service_id: Uuid,
    #[serde(default)]
    pub additional_info: Option<String>,
}

fn requisition_link(id: Uuid) -> Option<String> {
    Some(format!("/requisitions/{id}"))
}

/// Open a Pending requisition on an active, unblocked service and notify its provider.
#[instrument(skip(db, notifier, input), fields(actor = %actor.user_id, service_id = %input.service_id))]
pub async fn create(db: &DatabaseConnection, notifier: &Notifier, actor: &Actor, input: RequisitionInput) -> Result<service_requisition::Model, ServiceError> {
    let requester = user::Entity::find_by_id(actor.user_id).one(db).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    if requester.is_blocked {
        return Err(ServiceError::Forbidden("blocked users cannot request services".into()));
    }
    let target = service::Entity::find_by_id(input.service_id)
        .one(db)
        .await?
        .filter(|s| s.is_requestable())
        .ok_or_else(|| ServiceError::not_found("service"))?;
    if target.provider_id == actor.user_id {
        return Err(ServiceError::Validation("providers cannot request their own service".into()));
    }

    let txn = db.begin().await?;
    let created = service_requisition::create(&txn, target.id, actor.user_id, input.additional_info).await?;
    let (title, message) = notification_text(created.status, &target.name);
    let (_, email) = notifier.record(&txn, target.provider_id, &title, &message, requisition_link(created.id)).await?;
    txn.commit().await?;
    REQUISITION_TRANSITIONS_TOTAL.with_label_values(&[created.status.as_str()]).inc();
    notifier.deliver(email).await;
    info!(requisition_id = %created.id, "requisition_created");
    Ok(created)
}

/// Apply `event` for `actor`. Unknown ids, strangers and refused transitions all fail.
#[instrument(skip(db, notifier), fields(actor = %actor.user_id))]
pub async fn transition(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    id: Uuid,
    event: RequisitionEvent,
) -> Result<service_requisition::Model, ServiceError> {
    let found = service_requisition::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("requisition"))?;
    let target = service::Entity::find_by_id(found.service_id).one(db).await?.ok_or_else(|| ServiceError::not_found("service"))?;

    let party = if actor.user_id == target.provider_id {
        Party::Provider
    } else if actor.user_id == found.requisitioner_id {
        Party::Requisitioner
    } else {
        return Err(ServiceError::Forbidden("not a party to this requisition".into()));
    };
    let status = next_status(found.status, event, party)?;

    let now = Utc::now();
    let mut update = service_requisition::Entity::update_many()
        .col_expr(service_requisition::Column::Status, Expr::value(status))
        .col_expr(service_requisition::Column::UpdatedAt, Expr::value(now))
        .filter(service_requisition::Column::Id.eq(found.id))
        // only from the status that was checked; a concurrent transition wins
        .filter(service_requisition::Column::Status.eq(found.status));
    if status == RequisitionStatus::Concluded {
        update = update.col_expr(service_requisition::Column::ConclusionDate, Expr::value(now));
    }

    let txn = db.begin().await?;
    let applied = update.exec(&txn).await?;
    if applied.rows_affected == 0 {
        txn.rollback().await?;
        return Err(TransitionError::NotAllowed.into());
    }
    let updated = service_requisition::Entity::find_by_id(found.id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("requisition"))?;
    let counterparty = match required_party(event) {
        Party::Provider => found.requisitioner_id,
        Party::Requisitioner => target.provider_id,
    };
    let (title, message) = notification_text(status, &target.name);
    let (_, email) = notifier.record(&txn, counterparty, &title, &message, requisition_link(updated.id)).await?;
    txn.commit().await?;

    REQUISITION_TRANSITIONS_TOTAL.with_label_values(&[status.as_str()]).inc();
    notifier.deliver(email).await;
    info!(requisition_id = %id, from = found.status.as_str(), to = status.as_str(), "requisition_transition");
    Ok(updated)
}

/// Visible to the requisitioner and the provider of the service.
pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<service_requisition::Model, ServiceError> {
    let found = service_requisition::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("requisition"))?;
    if found.requisitioner_id == actor.user_id {
        return Ok(found);
    }
    let target = service::Entity::find_by_id(found.service_id).one(db).await?;
    match target {
        Some(s) if s.provider_id == actor.user_id => Ok(found),
        _ => Err(ServiceError::Forbidden("not a party to this requisition".into())),
    }
}

/// Requisitions the caller made, newest first.
pub async fn list_made(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<PaginatedList<service_requisition::Model>, ServiceError> {
    let rows = service_requisition::Entity::find()
        .filter(service_requisition::Column::RequisitionerId.eq(actor.user_id))
        .order_by_desc(service_requisition::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(PaginatedList::create(rows, opts))
}

/// Requisitions against the caller's services, newest first.
pub async fn list_received(
    db: &DatabaseConnection,
    actor: &Actor,
    status: Option<RequisitionStatus>,
    opts: Pagination,
) -> Result<PaginatedList<service_requisition::Model>, ServiceError> {
    let service_ids: Vec<Uuid> = service::Entity::find()
        .select_only()
        .column(service::Column::Id)
        .filter(service::Column::ProviderId.eq(actor.user_id))
        .into_tuple()
        .all(db)
        .await?;
    if service_ids.is_empty() {
        return Ok(PaginatedList::create(Vec::new(), opts));
    }
    let mut query = service_requisition::Entity::find().filter(service_requisition::Column::ServiceId.is_in(service_ids));
    if let Some(status) = status {
        query = query.filter(service_requisition::Column::Status.eq(status));
    }
    let rows = query.order_by_desc(service_requisition::Column::CreatedAt).all(db).await?;
    Ok(PaginatedList::create(rows, opts))
}
