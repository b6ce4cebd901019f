use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

/// Point configuration. At most one row is active at a time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gamification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub points_per_comment: i32,
    pub points_per_evaluation: i32,
    pub points_per_service: i32,
    pub is_active: bool,
    pub last_updated_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { LastUpdater }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::LastUpdater => Entity::belongs_to(user::Entity).from(Column::LastUpdatedBy).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    errors::require_text("name", name, 128)
}

pub fn validate_points(comment: i32, evaluation: i32, service: i32) -> Result<(), errors::ModelError> {
    if comment < 0 || evaluation < 0 || service < 0 {
        return Err(errors::ModelError::Validation("point values must be non-negative".into()));
    }
    Ok(())
}

/// Insert an inactive configuration; activation is a separate step.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    points_per_comment: i32,
    points_per_evaluation: i32,
    points_per_service: i32,
    updated_by: Uuid,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_points(points_per_comment, points_per_evaluation, points_per_service)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        points_per_comment: Set(points_per_comment),
        points_per_evaluation: Set(points_per_evaluation),
        points_per_service: Set(points_per_service),
        is_active: Set(false),
        last_updated_by: Set(Some(updated_by)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// The configuration currently marked active, if any.
pub async fn find_active<C: ConnectionTrait>(db: &C) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::IsActive.eq(true)).one(db).await?)
}
