use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, service_category, user};

/// A service offered by a provider.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: Option<f64>,
    pub is_active: bool,
    pub is_blocked: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether clients may currently open requisitions against this service.
    pub fn is_requestable(&self) -> bool {
        self.is_active && !self.is_blocked
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Provider, Category }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(user::Entity).from(Column::ProviderId).to(user::Column::Id).into(),
            Relation::Category => Entity::belongs_to(service_category::Entity).from(Column::CategoryId).to(service_category::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    errors::require_text("name", name, 128)
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    errors::require_text("description", description, 4000)
}

pub fn validate_price(price: Option<f64>) -> Result<(), errors::ModelError> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(errors::ModelError::Validation("price must be a non-negative number".into())),
        _ => Ok(()),
    }
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    provider_id: Uuid,
    category_id: Uuid,
    name: &str,
    description: &str,
    price: Option<f64>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_description(description)?;
    validate_price(price)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(provider_id),
        category_id: Set(category_id),
        name: Set(name.trim().to_string()),
        description: Set(description.trim().to_string()),
        price: Set(price),
        is_active: Set(true),
        is_blocked: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
