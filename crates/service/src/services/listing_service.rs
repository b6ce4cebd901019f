//! Services offered by providers.

use chrono::Utc;
use common::pagination::{PaginatedList, Pagination};
use models::service_requisition::RequisitionStatus;
use models::{service, service_category, service_requisition, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::access::{Actor, Permission};
use crate::errors::ServiceError;
use crate::gamification::ScoredAction;
use crate::services::gamification_service;

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceInput {
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub provider_id: Option<Uuid>,
}

async fn find(db: &DatabaseConnection, id: Uuid) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("service"))
}

async fn find_owned(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<service::Model, ServiceError> {
    let found = find(db, id).await?;
    if found.provider_id != actor.user_id {
        return Err(ServiceError::Forbidden("service belongs to another provider".into()));
    }
    Ok(found)
}

/// Requestable services, optionally narrowed by category or provider.
pub async fn list_public(db: &DatabaseConnection, filter: ListingFilter, opts: Pagination) -> Result<PaginatedList<service::Model>, ServiceError> {
    let mut query = service::Entity::find()
        .filter(service::Column::IsActive.eq(true))
        .filter(service::Column::IsBlocked.eq(false));
    if let Some(category) = filter.category_id {
        query = query.filter(service::Column::CategoryId.eq(category));
    }
    if let Some(provider) = filter.provider_id {
        query = query.filter(service::Column::ProviderId.eq(provider));
    }
    let rows = query.order_by_asc(service::Column::Name).all(db).await?;
    Ok(PaginatedList::create(rows, opts))
}

/// Every service of the caller, including inactive and blocked ones.
pub async fn list_mine(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<PaginatedList<service::Model>, ServiceError> {
    let rows = service::Entity::find()
        .filter(service::Column::ProviderId.eq(actor.user_id))
        .order_by_desc(service::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(PaginatedList::create(rows, opts))
}

/// Hidden services are visible to their owner and to moderators only.
pub async fn get(db: &DatabaseConnection, actor: Option<&Actor>, id: Uuid) -> Result<service::Model, ServiceError> {
    let found = find(db, id).await?;
    if !found.is_requestable() {
        match actor {
            Some(actor) => actor.require_owner_or(found.provider_id, Permission::ModerateServices)?,
            None => return Err(ServiceError::not_found("service")),
        }
    }
    Ok(found)
}

/// Create a service and award the provider the active per-service points.
#[instrument(skip(db, input), fields(provider = %actor.user_id))]
pub async fn create(db: &DatabaseConnection, actor: &Actor, input: ServiceInput) -> Result<service::Model, ServiceError> {
    actor.require(Permission::OfferServices)?;
    let provider = user::Entity::find_by_id(actor.user_id).one(db).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    if provider.is_blocked {
        return Err(ServiceError::Forbidden("blocked users cannot offer services".into()));
    }
    if service_category::Entity::find_by_id(input.category_id).one(db).await?.is_none() {
        return Err(ServiceError::Validation("category does not exist".into()));
    }
    let txn = db.begin().await?;
    let created = service::create(&txn, actor.user_id, input.category_id, &input.name, &input.description, input.price).await?;
    gamification_service::award_for(&txn, actor.user_id, &[ScoredAction::ServiceCreated]).await?;
    txn.commit().await?;
    info!(service_id = %created.id, "service_created");
    Ok(created)
}

pub async fn update(db: &DatabaseConnection, actor: &Actor, id: Uuid, input: ServiceInput) -> Result<service::Model, ServiceError> {
    let found = find_owned(db, actor, id).await?;
    service::validate_name(&input.name)?;
    service::validate_description(&input.description)?;
    service::validate_price(input.price)?;
    if input.category_id != found.category_id && service_category::Entity::find_by_id(input.category_id).one(db).await?.is_none() {
        return Err(ServiceError::Validation("category does not exist".into()));
    }
    let mut am: service::ActiveModel = found.into();
    am.category_id = Set(input.category_id);
    am.name = Set(input.name.trim().to_string());
    am.description = Set(input.description.trim().to_string());
    am.price = Set(input.price);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Owner toggles whether the service accepts requisitions.
pub async fn set_active(db: &DatabaseConnection, actor: &Actor, id: Uuid, active: bool) -> Result<service::Model, ServiceError> {
    let found = find_owned(db, actor, id).await?;
    let mut am: service::ActiveModel = found.into();
    am.is_active = Set(active);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn set_blocked(db: &DatabaseConnection, actor: &Actor, id: Uuid, blocked: bool) -> Result<service::Model, ServiceError> {
    actor.require(Permission::ModerateServices)?;
    let found = find(db, id).await?;
    let mut am: service::ActiveModel = found.into();
    am.is_blocked = Set(blocked);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(service_id = %id, blocked, by = %actor.user_id, "service_block_changed");
    Ok(updated)
}

/// Owner or administrator; refused while requisitions are still open.
pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let found = find(db, id).await?;
    actor.require_owner_or(found.provider_id, Permission::DeleteAnyService)?;
    let open = service_requisition::Entity::find()
        .filter(service_requisition::Column::ServiceId.eq(found.id))
        .filter(service_requisition::Column::Status.is_in([RequisitionStatus::Pending, RequisitionStatus::Accepted]))
        .one(db)
        .await?;
    if open.is_some() {
        return Err(ServiceError::Conflict("service has open requisitions".into()));
    }
    service::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixtures, mock_db};
    use models::gamification;
    use models::user::Role;
    use sea_orm::MockExecResult;

    fn input(category_id: Uuid) -> ServiceInput {
        ServiceInput { category_id, name: "Pintura".into(), description: "Pintura de interiores".into(), price: Some(40.0) }
    }

    #[tokio::test]
    async fn only_providers_create() {
        let db = mock_db().into_connection();
        for role in [Role::Cliente, Role::Moderador, Role::Administrador] {
            let actor = Actor::new(Uuid::new_v4(), role);
            assert!(create(&db, &actor, input(Uuid::new_v4())).await.unwrap_err().is_hidden());
        }
    }

    #[tokio::test]
    async fn creation_awards_service_points() {
        let provider = fixtures::user(Role::Prestador);
        let category = fixtures::category(None);
        let created = service::Model { category_id: category.id, ..fixtures::service(provider.id) };
        let db = mock_db()
            .append_query_results([vec![provider.clone()]])
            .append_query_results([vec![category.clone()]])
            .append_query_results([vec![created.clone()]])
            .append_query_results([vec![fixtures::gamification(true, 1, 1, 7)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();
        let actor = Actor::new(provider.id, Role::Prestador);
        let result = create(&db, &actor, input(category.id)).await.unwrap();
        assert_eq!(result.id, created.id);
        let log = db.into_transaction_log();
        let txn = format!("{:?}", log.last().unwrap());
        assert!(txn.contains("total_points") && txn.contains("COMMIT"));
    }

    #[tokio::test]
    async fn creation_without_active_configuration_awards_nothing() {
        let provider = fixtures::user(Role::Prestador);
        let category = fixtures::category(None);
        let db = mock_db()
            .append_query_results([vec![provider.clone()]])
            .append_query_results([vec![category.clone()]])
            .append_query_results([vec![fixtures::service(provider.id)]])
            .append_query_results([Vec::<gamification::Model>::new()])
            .into_connection();
        let actor = Actor::new(provider.id, Role::Prestador);
        create(&db, &actor, input(category.id)).await.unwrap();
        let log = db.into_transaction_log();
        assert!(!format!("{:?}", log.last().unwrap()).contains("total_points"));
    }

    #[tokio::test]
    async fn blocked_service_hidden_from_clients() {
        let svc = service::Model { is_blocked: true, ..fixtures::service(Uuid::new_v4()) };
        let db = mock_db().append_query_results([vec![svc.clone()]]).into_connection();
        let client = Actor::new(Uuid::new_v4(), Role::Cliente);
        assert!(get(&db, Some(&client), svc.id).await.unwrap_err().is_hidden());
    }

    #[tokio::test]
    async fn other_provider_cannot_edit() {
        let svc = fixtures::service(Uuid::new_v4());
        let db = mock_db().append_query_results([vec![svc.clone()]]).into_connection();
        let other = Actor::new(Uuid::new_v4(), Role::Prestador);
        assert!(update(&db, &other, svc.id, input(svc.category_id)).await.unwrap_err().is_hidden());
    }

    #[tokio::test]
    async fn delete_refused_with_open_requisitions() {
        let svc = fixtures::service(Uuid::new_v4());
        let open = fixtures::requisition(svc.id, Uuid::new_v4(), RequisitionStatus::Accepted);
        let db = mock_db()
            .append_query_results([vec![svc.clone()]])
            .append_query_results([vec![open]])
            .into_connection();
        let owner = Actor::new(svc.provider_id, Role::Prestador);
        assert!(matches!(delete(&db, &owner, svc.id).await, Err(ServiceError::Conflict(_))));
    }
}
