//! Point awarding and administration of gamification configurations.

use chrono::Utc;
use models::{gamification, user};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::access::{Actor, Permission};
use crate::errors::ServiceError;
use crate::gamification::{total_points, ScoredAction};
use crate::metrics::POINTS_AWARDED_TOTAL;

#[derive(Clone, Debug, Deserialize)]
pub struct GamificationInput {
    pub name: String,
    pub points_per_comment: i32,
    pub points_per_evaluation: i32,
    pub points_per_service: i32,
}

/// Add `points` to the user's running total in a single statement.
pub async fn award_points<C: ConnectionTrait>(db: &C, user_id: Uuid, points: i32) -> Result<(), ServiceError> {
    if points <= 0 {
        return Ok(());
    }
    user::Entity::update_many()
        .col_expr(user::Column::TotalPoints, Expr::col(user::Column::TotalPoints).add(points))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    POINTS_AWARDED_TOTAL.inc_by(points as u64);
    Ok(())
}

/// Award what the active configuration grants for `actions`; a no-op when none is active.
#[instrument(skip(db))]
pub async fn award_for<C: ConnectionTrait>(db: &C, user_id: Uuid, actions: &[ScoredAction]) -> Result<i32, ServiceError> {
    let active = gamification::find_active(db).await?;
    let points = total_points(active.as_ref(), actions);
    award_points(db, user_id, points).await?;
    if points > 0 {
        info!(%user_id, points, "points_awarded");
    }
    Ok(points)
}

pub async fn list(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<gamification::Model>, ServiceError> {
    actor.require(Permission::ManageGamification)?;
    Ok(gamification::Entity::find().order_by_asc(gamification::Column::Name).all(db).await?)
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<gamification::Model, ServiceError> {
    actor.require(Permission::ManageGamification)?;
    gamification::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("gamification"))
}

pub async fn create(db: &DatabaseConnection, actor: &Actor, input: GamificationInput) -> Result<gamification::Model, ServiceError> {
    actor.require(Permission::ManageGamification)?;
    let created = gamification::create(
        db,
        &input.name,
        input.points_per_comment,
        input.points_per_evaluation,
        input.points_per_service,
        actor.user_id,
    )
    .await?;
    Ok(created)
}

pub async fn update(db: &DatabaseConnection, actor: &Actor, id: Uuid, input: GamificationInput) -> Result<gamification::Model, ServiceError> {
    let found = get(db, actor, id).await?;
    gamification::validate_name(&input.name)?;
    gamification::validate_points(input.points_per_comment, input.points_per_evaluation, input.points_per_service)?;
    let mut am: gamification::ActiveModel = found.into();
    am.name = Set(input.name.trim().to_string());
    am.points_per_comment = Set(input.points_per_comment);
    am.points_per_evaluation = Set(input.points_per_evaluation);
    am.points_per_service = Set(input.points_per_service);
    am.last_updated_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let found = get(db, actor, id).await?;
    gamification::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

/// Make `id` the only active configuration.
#[instrument(skip(db, actor), fields(actor = %actor.user_id))]
pub async fn activate(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<gamification::Model, ServiceError> {
    actor.require(Permission::ManageGamification)?;
    let txn = db.begin().await?;
    let target = gamification::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("gamification"))?;
    gamification::Entity::update_many()
        .col_expr(gamification::Column::IsActive, Expr::value(false))
        .filter(gamification::Column::Id.ne(id))
        .filter(gamification::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    let mut am: gamification::ActiveModel = target.into();
    am.is_active = Set(true);
    am.last_updated_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    let activated = am.update(&txn).await?;
    txn.commit().await?;
    info!(gamification_id = %id, "gamification_activated");
    Ok(activated)
}

pub async fn deactivate(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<gamification::Model, ServiceError> {
    let found = get(db, actor, id).await?;
    let mut am: gamification::ActiveModel = found.into();
    am.is_active = Set(false);
    am.last_updated_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
