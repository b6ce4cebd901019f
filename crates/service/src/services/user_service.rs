use uuid::Uuid;
use chrono::Utc;
use common::pagination::{PaginatedList, Pagination};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use tracing::info;

use models::user::{self, Role};
use crate::access::{Actor, Permission};
use crate::errors::ServiceError;

/// Ranking row: public view of a user's points.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RankingEntry {
    pub position: usize,
    pub user_id: Uuid,
    pub name: String,
    pub total_points: i32,
}

async fn find_live(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|u| u.deleted_at.is_none())
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Profile visible to its owner and to holders of `BlockUsers`.
pub async fn get_user(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<user::Model, ServiceError> {
    actor.require_owner_or(id, Permission::BlockUsers)?;
    find_live(db, id).await
}

pub async fn list_users(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<PaginatedList<user::Model>, ServiceError> {
    actor.require(Permission::BlockUsers)?;
    let users = user::Entity::find()
        .filter(user::Column::DeletedAt.is_null())
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?;
    Ok(PaginatedList::create(users, opts))
}

/// Update the caller's own display name.
pub async fn update_user_name(db: &DatabaseConnection, actor: &Actor, id: Uuid, name: &str) -> Result<user::Model, ServiceError> {
    if actor.user_id != id {
        return Err(ServiceError::Forbidden("profiles are edited by their owner".into()));
    }
    user::validate_name(name)?;
    let mut am: user::ActiveModel = find_live(db, id).await?.into();
    am.name = Set(name.trim().to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn set_role(db: &DatabaseConnection, actor: &Actor, id: Uuid, role: Role) -> Result<user::Model, ServiceError> {
    actor.require(Permission::ManageRoles)?;
    if actor.user_id == id {
        return Err(ServiceError::Validation("cannot change your own role".into()));
    }
    let mut am: user::ActiveModel = find_live(db, id).await?.into();
    am.role = Set(role);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(user_id = %id, role = ?role, by = %actor.user_id, "role_assigned");
    Ok(updated)
}

pub async fn set_blocked(db: &DatabaseConnection, actor: &Actor, id: Uuid, blocked: bool) -> Result<user::Model, ServiceError> {
    actor.require(Permission::BlockUsers)?;
    if actor.user_id == id {
        return Err(ServiceError::Validation("cannot block yourself".into()));
    }
    let target = find_live(db, id).await?;
    if target.role == Role::Administrador && actor.role != Role::Administrador {
        return Err(ServiceError::Forbidden("administrators are blocked by administrators".into()));
    }
    let mut am: user::ActiveModel = target.into();
    am.is_blocked = Set(blocked);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(user_id = %id, blocked, by = %actor.user_id, "user_block_changed");
    Ok(updated)
}

/// Soft-delete (marks deleted_at). Owner or role manager.
pub async fn soft_delete_user(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require_owner_or(id, Permission::ManageRoles)?;
    find_live(db, id).await?;
    user::soft_delete(db, id).await?;
    Ok(())
}

/// Users ordered by points, highest first.
pub async fn ranking(db: &DatabaseConnection, opts: Pagination) -> Result<PaginatedList<RankingEntry>, ServiceError> {
    let users = user::Entity::find()
        .filter(user::Column::DeletedAt.is_null())
        .filter(user::Column::IsBlocked.eq(false))
        .order_by_desc(user::Column::TotalPoints)
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?;
    let entries = users
        .into_iter()
        .enumerate()
        .map(|(i, u)| RankingEntry { position: i + 1, user_id: u.id, name: u.name, total_points: u.total_points })
        .collect();
    Ok(PaginatedList::create(entries, opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixtures, get_db, mock_db};

    #[tokio::test]
    async fn profile_hidden_from_other_clients() {
        let db = mock_db().into_connection();
        let me = Actor::new(Uuid::new_v4(), Role::Cliente);
        let err = get_user(&db, &me, Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_hidden());
    }

    #[tokio::test]
    async fn moderator_blocks_client() {
        let target = fixtures::user(Role::Cliente);
        let blocked = user::Model { is_blocked: true, ..target.clone() };
        let db = mock_db()
            .append_query_results([vec![target.clone()]])
            .append_query_results([vec![blocked]])
            .into_connection();
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        let updated = set_blocked(&db, &moderator, target.id, true).await.unwrap();
        assert!(updated.is_blocked);
    }

    #[tokio::test]
    async fn moderator_cannot_block_administrator() {
        let target = fixtures::user(Role::Administrador);
        let db = mock_db().append_query_results([vec![target.clone()]]).into_connection();
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        let err = set_blocked(&db, &moderator, target.id, true).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn only_administrator_assigns_roles() {
        let db = mock_db().into_connection();
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        let err = set_role(&db, &moderator, Uuid::new_v4(), Role::Moderador).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn ranking_orders_positions() {
        let mut a = fixtures::user(Role::Cliente);
        a.total_points = 30;
        let mut b = fixtures::user(Role::Prestador);
        b.total_points = 10;
        let db = mock_db().append_query_results([vec![a.clone(), b.clone()]]).into_connection();
        let page = ranking(&db, Pagination::default()).await.unwrap();
        assert_eq!(page.items[0].position, 1);
        assert_eq!(page.items[0].user_id, a.id);
        assert_eq!(page.items[1].total_points, 10);
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let email = format!("svc_{}@example.com", Uuid::new_v4());
        let u = user::create(&db, &email, "Svc User", Role::Cliente).await?;
        let me = Actor::new(u.id, u.role);

        let found = get_user(&db, &me, u.id).await?;
        assert_eq!(found.id, u.id);

        let updated = update_user_name(&db, &me, u.id, "New Name").await?;
        assert_eq!(updated.name, "New Name");

        soft_delete_user(&db, &me, u.id).await?;
        assert!(matches!(get_user(&db, &me, u.id).await, Err(ServiceError::NotFound(_))));

        user::hard_delete(&db, u.id).await?;
        Ok(())
    }
}
