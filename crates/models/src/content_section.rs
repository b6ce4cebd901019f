use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

/// Static page a section belongs to. Serialized as the kebab-case path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    #[sea_orm(string_value = "About")]
    About,
    #[sea_orm(string_value = "Norm")]
    Norm,
    #[sea_orm(string_value = "PrivacyPolicy")]
    PrivacyPolicy,
    #[sea_orm(string_value = "TermsAndConditions")]
    TermsAndConditions,
    #[sea_orm(string_value = "UserManual")]
    UserManual,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_section")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: ContentKind,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub position: i32,
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

pub fn validate(title: &str, body: &str, position: i32) -> Result<(), errors::ModelError> {
    errors::require_text("title", title, 160)?;
    errors::require_text("body", body, 20_000)?;
    if position < 0 {
        return Err(errors::ModelError::Validation("position must be non-negative".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    kind: ContentKind,
    title: &str,
    body: &str,
    position: i32,
    updated_by: Uuid,
) -> Result<Model, errors::ModelError> {
    validate(title, body, position)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(kind),
        title: Set(title.trim().to_string()),
        body: Set(body.to_string()),
        position: Set(position),
        last_updated_by: Set(Some(updated_by)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
