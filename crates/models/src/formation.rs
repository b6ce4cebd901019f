use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

/// Scheduled training session with a seat limit.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "formation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    pub starts_at: DateTimeWithTimeZone,
    pub duration_minutes: i32,
    pub capacity: i32,
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

/// Form fields shared by create and edit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormationInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTimeWithTimeZone,
    pub duration_minutes: i32,
    pub capacity: i32,
}

pub fn validate(input: &FormationInput) -> Result<(), errors::ModelError> {
    errors::require_text("title", &input.title, 160)?;
    errors::require_text("description", &input.description, 4000)?;
    errors::require_text("location", &input.location, 255)?;
    if input.duration_minutes <= 0 {
        return Err(errors::ModelError::Validation("duration_minutes must be positive".into()));
    }
    if input.capacity <= 0 {
        return Err(errors::ModelError::Validation("capacity must be positive".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, input: FormationInput, updated_by: Uuid) -> Result<Model, errors::ModelError> {
    validate(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description.trim().to_string()),
        location: Set(input.location.trim().to_string()),
        starts_at: Set(input.starts_at),
        duration_minutes: Set(input.duration_minutes),
        capacity: Set(input.capacity),
        last_updated_by: Set(Some(updated_by)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
