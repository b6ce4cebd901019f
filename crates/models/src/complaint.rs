use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, service, user};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ComplaintState {
    #[sea_orm(string_value = "Pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "Resolved")]
    Resolved,
    #[sea_orm(string_value = "Dismissed")]
    Dismissed,
}

/// Complaint filed against a service and/or a user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub complainant_id: Uuid,
    pub service_id: Option<Uuid>,
    pub target_user_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub state: ComplaintState,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution: Option<String>,
    pub handled_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Complainant, Service, TargetUser }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Complainant => Entity::belongs_to(user::Entity).from(Column::ComplainantId).to(user::Column::Id).into(),
            Relation::Service => Entity::belongs_to(service::Entity).from(Column::ServiceId).to(service::Column::Id).into(),
            Relation::TargetUser => Entity::belongs_to(user::Entity).from(Column::TargetUserId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_reason(reason: &str) -> Result<(), errors::ModelError> {
    errors::require_text("reason", reason, 2000)
}

pub fn validate_target(service_id: Option<Uuid>, target_user_id: Option<Uuid>) -> Result<(), errors::ModelError> {
    if service_id.is_none() && target_user_id.is_none() {
        return Err(errors::ModelError::Validation("complaint needs a service or a user".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    complainant_id: Uuid,
    service_id: Option<Uuid>,
    target_user_id: Option<Uuid>,
    reason: &str,
) -> Result<Model, errors::ModelError> {
    validate_target(service_id, target_user_id)?;
    validate_reason(reason)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        complainant_id: Set(complainant_id),
        service_id: Set(service_id),
        target_user_id: Set(target_user_id),
        reason: Set(reason.trim().to_string()),
        state: Set(ComplaintState::Pending),
        resolution: Set(None),
        handled_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
