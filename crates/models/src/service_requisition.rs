use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, service, user};

/// Requisition status as stored in the `status` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RequisitionStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Accepted")]
    Accepted,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
    #[sea_orm(string_value = "Concluded")]
    Concluded,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl RequisitionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequisitionStatus::Pending => "Pending",
            RequisitionStatus::Accepted => "Accepted",
            RequisitionStatus::Rejected => "Rejected",
            RequisitionStatus::Concluded => "Concluded",
            RequisitionStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_requisition")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub requisitioner_id: Uuid,
    pub status: RequisitionStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_info: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub conclusion_date: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service, Requisitioner }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity).from(Column::ServiceId).to(service::Column::Id).into(),
            Relation::Requisitioner => Entity::belongs_to(user::Entity).from(Column::RequisitionerId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_additional_info(info: Option<&str>) -> Result<(), errors::ModelError> {
    match info {
        Some(text) if text.chars().count() > 2000 => Err(errors::ModelError::Validation("additional_info longer than 2000 characters".into())),
        _ => Ok(()),
    }
}

/// Insert a new requisition in `Pending`.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    requisitioner_id: Uuid,
    additional_info: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_additional_info(additional_info.as_deref())?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(service_id),
        requisitioner_id: Set(requisitioner_id),
        status: Set(RequisitionStatus::Pending),
        additional_info: Set(additional_info.filter(|s| !s.trim().is_empty())),
        created_at: Set(now),
        updated_at: Set(now),
        conclusion_date: Set(None),
    };
    Ok(am.insert(db).await?)
}
