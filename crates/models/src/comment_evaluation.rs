use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, service, service_requisition, user};

pub const MIN_EVALUATION: i32 = 1;
pub const MAX_EVALUATION: i32 = 5;

/// Comment and/or evaluation left on a service after a concluded requisition.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment_evaluation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub author_id: Uuid,
    #[sea_orm(unique)]
    pub requisition_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub evaluation: Option<i32>,
    pub is_removed: bool,
    pub removed_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Service, Author, Requisition }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity).from(Column::ServiceId).to(service::Column::Id).into(),
            Relation::Author => Entity::belongs_to(user::Entity).from(Column::AuthorId).to(user::Column::Id).into(),
            Relation::Requisition => Entity::belongs_to(service_requisition::Entity).from(Column::RequisitionId).to(service_requisition::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// At least one of comment or evaluation; evaluation within 1..=5.
pub fn validate_content(comment: Option<&str>, evaluation: Option<i32>) -> Result<(), errors::ModelError> {
    let comment = comment.filter(|c| !c.trim().is_empty());
    if comment.is_none() && evaluation.is_none() {
        return Err(errors::ModelError::Validation("comment or evaluation required".into()));
    }
    if let Some(text) = comment {
        errors::require_text("comment", text, 2000)?;
    }
    if let Some(score) = evaluation {
        if !(MIN_EVALUATION..=MAX_EVALUATION).contains(&score) {
            return Err(errors::ModelError::Validation(format!("evaluation must be between {MIN_EVALUATION} and {MAX_EVALUATION}")));
        }
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    author_id: Uuid,
    requisition_id: Uuid,
    comment: Option<String>,
    evaluation: Option<i32>,
) -> Result<Model, errors::ModelError> {
    validate_content(comment.as_deref(), evaluation)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(service_id),
        author_id: Set(author_id),
        requisition_id: Set(requisition_id),
        comment: Set(comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())),
        evaluation: Set(evaluation),
        is_removed: Set(false),
        removed_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
