use chrono::{DateTime, Utc};
use common::pagination::{PaginatedList, Pagination};
use models::formation::{self, FormationInput};
use models::enrollment;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::access::{Actor, Permission};
use crate::errors::ServiceError;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FormationDetail {
    #[serde(flatten)]
    pub formation: formation::Model,
    pub enrolled: usize,
    pub seats_left: i32,
    pub is_enrolled: bool,
}

/// Whether a new enrollment fits: seats remain, not started, not already enrolled.
pub fn check_enrollment(formation: &formation::Model, enrolled: usize, already: bool, now: DateTime<Utc>) -> Result<(), ServiceError> {
    if already {
        return Err(ServiceError::Conflict("already enrolled".into()));
    }
    if formation.starts_at <= now {
        return Err(ServiceError::Validation("formation already started".into()));
    }
    if enrolled as i64 >= formation.capacity as i64 {
        return Err(ServiceError::Conflict("formation is full".into()));
    }
    Ok(())
}

async fn find(db: &DatabaseConnection, id: Uuid) -> Result<formation::Model, ServiceError> {
    formation::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("formation"))
}

pub async fn list(db: &DatabaseConnection, upcoming_only: bool, opts: Pagination) -> Result<PaginatedList<formation::Model>, ServiceError> {
    let mut query = formation::Entity::find();
    if upcoming_only {
        query = query.filter(formation::Column::StartsAt.gt(Utc::now()));
    }
    let rows = query.order_by_asc(formation::Column::StartsAt).all(db).await?;
    Ok(PaginatedList::create(rows, opts))
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<FormationDetail, ServiceError> {
    let found = find(db, id).await?;
    let enrollments = enrollment::list_for_formation(db, id).await?;
    let enrolled = enrollments.len();
    Ok(FormationDetail {
        seats_left: (found.capacity - enrolled as i32).max(0),
        is_enrolled: enrollments.iter().any(|e| e.user_id == actor.user_id),
        enrolled,
        formation: found,
    })
}

pub async fn create(db: &DatabaseConnection, actor: &Actor, input: FormationInput) -> Result<formation::Model, ServiceError> {
    actor.require(Permission::ManageFormations)?;
    Ok(formation::create(db, input, actor.user_id).await?)
}

pub async fn update(db: &DatabaseConnection, actor: &Actor, id: Uuid, input: FormationInput) -> Result<formation::Model, ServiceError> {
    actor.require(Permission::ManageFormations)?;
    formation::validate(&input)?;
    let found = find(db, id).await?;
    let enrolled = enrollment::list_for_formation(db, id).await?.len();
    if (input.capacity as usize) < enrolled {
        return Err(ServiceError::Validation(format!("capacity below the {enrolled} current enrollments")));
    }
    let mut am: formation::ActiveModel = found.into();
    am.title = Set(input.title.trim().to_string());
    am.description = Set(input.description.trim().to_string());
    am.location = Set(input.location.trim().to_string());
    am.starts_at = Set(input.starts_at);
    am.duration_minutes = Set(input.duration_minutes);
    am.capacity = Set(input.capacity);
    am.last_updated_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require(Permission::ManageFormations)?;
    let found = find(db, id).await?;
    let txn = db.begin().await?;
    enrollment::Entity::delete_many().filter(enrollment::Column::FormationId.eq(id)).exec(&txn).await?;
    found.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

pub async fn enroll(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<enrollment::Model, ServiceError> {
    let found = find(db, id).await?;
    let enrollments = enrollment::list_for_formation(db, id).await?;
    let already = enrollments.iter().any(|e| e.user_id == actor.user_id);
    check_enrollment(&found, enrollments.len(), already, Utc::now())?;
    let created = enrollment::create(db, id, actor.user_id).await?;
    info!(formation_id = %id, user_id = %actor.user_id, "enrolled");
    Ok(created)
}

pub async fn withdraw(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let res = enrollment::Entity::delete_many()
        .filter(enrollment::Column::FormationId.eq(id))
        .filter(enrollment::Column::UserId.eq(actor.user_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("enrollment"));
    }
    Ok(())
}

pub async fn list_enrollments(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<Vec<enrollment::Model>, ServiceError> {
    actor.require(Permission::ManageFormations)?;
    find(db, id).await?;
    Ok(enrollment::list_for_formation(db, id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixtures, mock_db};
    use chrono::Duration;
    use models::user::Role;
    use sea_orm::MockExecResult;

    #[test]
    fn enrollment_rules() {
        let now = Utc::now();
        let upcoming = fixtures::formation(2, 3);
        assert!(check_enrollment(&upcoming, 1, false, now).is_ok());
        assert!(matches!(check_enrollment(&upcoming, 2, false, now), Err(ServiceError::Conflict(_))));
        assert!(matches!(check_enrollment(&upcoming, 0, true, now), Err(ServiceError::Conflict(_))));
        assert!(matches!(check_enrollment(&upcoming, 0, false, now + Duration::days(4)), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn full_formation_refuses_enrollment() {
        let f = fixtures::formation(1, 5);
        let taken = fixtures::enrollment(f.id, Uuid::new_v4());
        let db = mock_db()
            .append_query_results([vec![f.clone()]])
            .append_query_results([vec![taken]])
            .into_connection();
        let me = Actor::new(Uuid::new_v4(), Role::Cliente);
        assert!(matches!(enroll(&db, &me, f.id).await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn capacity_cannot_drop_below_enrollments() {
        let f = fixtures::formation(3, 5);
        let rows = vec![fixtures::enrollment(f.id, Uuid::new_v4()), fixtures::enrollment(f.id, Uuid::new_v4())];
        let db = mock_db()
            .append_query_results([vec![f.clone()]])
            .append_query_results([rows])
            .into_connection();
        let input = FormationInput {
            title: f.title.clone(),
            description: f.description.clone(),
            location: f.location.clone(),
            starts_at: f.starts_at,
            duration_minutes: f.duration_minutes,
            capacity: 1,
        };
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        assert!(matches!(update(&db, &moderator, f.id, input).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn withdraw_without_enrollment_is_not_found() {
        let db = mock_db()
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();
        let me = Actor::new(Uuid::new_v4(), Role::Cliente);
        assert!(matches!(withdraw(&db, &me, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn detail_reports_seats() {
        let f = fixtures::formation(3, 5);
        let me = Uuid::new_v4();
        let db = mock_db()
            .append_query_results([vec![f.clone()]])
            .append_query_results([vec![fixtures::enrollment(f.id, me)]])
            .into_connection();
        let detail = get(&db, &Actor::new(me, Role::Cliente), f.id).await.unwrap();
        assert_eq!(detail.seats_left, 2);
        assert!(detail.is_enrolled);
    }
}
