use chrono::Utc;
use models::content_section::{self, ContentKind};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{Actor, Permission};
use crate::errors::ServiceError;

#[derive(Clone, Debug, Deserialize)]
pub struct ContentInput {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub position: i32,
}

/// Public sections of one page, in display order.
pub async fn list_by_kind(db: &DatabaseConnection, kind: ContentKind) -> Result<Vec<content_section::Model>, ServiceError> {
    Ok(content_section::Entity::find()
        .filter(content_section::Column::Kind.eq(kind))
        .order_by_asc(content_section::Column::Position)
        .order_by_asc(content_section::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<content_section::Model, ServiceError> {
    content_section::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("content"))
}

pub async fn create(db: &DatabaseConnection, actor: &Actor, kind: ContentKind, input: ContentInput) -> Result<content_section::Model, ServiceError> {
    actor.require(Permission::ManageContent)?;
    Ok(content_section::create(db, kind, &input.title, &input.body, input.position, actor.user_id).await?)
}

pub async fn update(db: &DatabaseConnection, actor: &Actor, id: Uuid, input: ContentInput) -> Result<content_section::Model, ServiceError> {
    actor.require(Permission::ManageContent)?;
    content_section::validate(&input.title, &input.body, input.position)?;
    let mut am: content_section::ActiveModel = get(db, id).await?.into();
    am.title = Set(input.title.trim().to_string());
    am.body = Set(input.body);
    am.position = Set(input.position);
    am.last_updated_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require(Permission::ManageContent)?;
    let found = get(db, id).await?;
    content_section::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixtures, mock_db};
    use models::user::Role;

    #[tokio::test]
    async fn sections_come_back_in_order() {
        let rows = vec![fixtures::content(ContentKind::Norm, 0), fixtures::content(ContentKind::Norm, 1)];
        let db = mock_db().append_query_results([rows.clone()]).into_connection();
        let listed = list_by_kind(&db, ContentKind::Norm).await.unwrap();
        assert_eq!(listed, rows);
    }

    #[tokio::test]
    async fn moderators_cannot_edit_content() {
        let db = mock_db().into_connection();
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        let input = ContentInput { title: "Sobre".into(), body: "Texto".into(), position: 0 };
        assert!(create(&db, &moderator, ContentKind::About, input).await.unwrap_err().is_hidden());
    }
}
