use std::collections::HashMap;

use chrono::Utc;
use models::{service, service_category};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{Actor, Permission};
use crate::errors::ServiceError;

#[derive(Clone, Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: service_category::Model,
    pub children: Vec<CategoryNode>,
}

/// Arrange a flat list into root nodes with nested subcategories.
///
/// Rows whose parent is missing from the list are treated as roots.
pub fn build_tree(categories: Vec<service_category::Model>) -> Vec<CategoryNode> {
    let known: std::collections::HashSet<Uuid> = categories.iter().map(|c| c.id).collect();
    let mut by_parent: HashMap<Option<Uuid>, Vec<service_category::Model>> = HashMap::new();
    for c in categories {
        let parent = c.parent_id.filter(|p| known.contains(p));
        by_parent.entry(parent).or_default().push(c);
    }
    fn attach(parent: Option<Uuid>, by_parent: &mut HashMap<Option<Uuid>, Vec<service_category::Model>>) -> Vec<CategoryNode> {
        let mut level = by_parent.remove(&parent).unwrap_or_default();
        level.sort_by(|a, b| a.name.cmp(&b.name));
        level
            .into_iter()
            .map(|category| {
                let children = attach(Some(category.id), by_parent);
                CategoryNode { category, children }
            })
            .collect()
    }
    attach(None, &mut by_parent)
}

/// True when making `new_parent` the parent of `id` would close a loop.
pub fn would_create_cycle(categories: &[service_category::Model], id: Uuid, new_parent: Uuid) -> bool {
    let parents: HashMap<Uuid, Option<Uuid>> = categories.iter().map(|c| (c.id, c.parent_id)).collect();
    let mut cursor = Some(new_parent);
    let mut steps = 0;
    while let Some(current) = cursor {
        if current == id {
            return true;
        }
        steps += 1;
        if steps > parents.len() {
            return true;
        }
        cursor = parents.get(&current).copied().flatten();
    }
    false
}

pub async fn list_tree(db: &DatabaseConnection) -> Result<Vec<CategoryNode>, ServiceError> {
    let all = service_category::Entity::find().order_by_asc(service_category::Column::Name).all(db).await?;
    Ok(build_tree(all))
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<service_category::Model, ServiceError> {
    service_category::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("category"))
}

async fn ensure_parent(db: &DatabaseConnection, parent_id: Option<Uuid>) -> Result<(), ServiceError> {
    if let Some(parent) = parent_id {
        if service_category::Entity::find_by_id(parent).one(db).await?.is_none() {
            return Err(ServiceError::Validation("parent category does not exist".into()));
        }
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, actor: &Actor, input: CategoryInput) -> Result<service_category::Model, ServiceError> {
    actor.require(Permission::ManageCategories)?;
    ensure_parent(db, input.parent_id).await?;
    Ok(service_category::create(db, &input.name, input.description, input.parent_id, actor.user_id).await?)
}

pub async fn update(db: &DatabaseConnection, actor: &Actor, id: Uuid, input: CategoryInput) -> Result<service_category::Model, ServiceError> {
    actor.require(Permission::ManageCategories)?;
    service_category::validate_name(&input.name)?;
    let found = get(db, id).await?;
    if let Some(parent) = input.parent_id {
        let all = service_category::Entity::find().all(db).await?;
        if !all.iter().any(|c| c.id == parent) {
            return Err(ServiceError::Validation("parent category does not exist".into()));
        }
        if would_create_cycle(&all, id, parent) {
            return Err(ServiceError::Validation("a category cannot be nested under itself".into()));
        }
    }
    let mut am: service_category::ActiveModel = found.into();
    am.name = Set(input.name.trim().to_string());
    am.description = Set(input.description);
    am.parent_id = Set(input.parent_id);
    am.last_updated_by = Set(Some(actor.user_id));
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Refused while the category still has subcategories or services.
pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    actor.require(Permission::ManageCategories)?;
    let found = get(db, id).await?;
    let child = service_category::Entity::find()
        .filter(service_category::Column::ParentId.eq(found.id))
        .one(db)
        .await?;
    if child.is_some() {
        return Err(ServiceError::Conflict("category has subcategories".into()));
    }
    let offered = service::Entity::find().filter(service::Column::CategoryId.eq(found.id)).one(db).await?;
    if offered.is_some() {
        return Err(ServiceError::Conflict("category has services".into()));
    }
    service_category::Entity::delete_by_id(found.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixtures, mock_db};
    use models::user::Role;

    #[test]
    fn tree_nests_children_under_parents() {
        let root = fixtures::category(None);
        let child = fixtures::category(Some(root.id));
        let grandchild = fixtures::category(Some(child.id));
        let orphan = fixtures::category(Some(Uuid::new_v4()));
        let tree = build_tree(vec![grandchild.clone(), orphan.clone(), child.clone(), root.clone()]);
        assert_eq!(tree.len(), 2);
        let root_node = tree.iter().find(|n| n.category.id == root.id).unwrap();
        assert_eq!(root_node.children[0].category.id, child.id);
        assert_eq!(root_node.children[0].children[0].category.id, grandchild.id);
        assert!(tree.iter().any(|n| n.category.id == orphan.id));
    }

    #[test]
    fn cycle_detection() {
        let a = fixtures::category(None);
        let b = fixtures::category(Some(a.id));
        let c = fixtures::category(Some(b.id));
        let all = vec![a.clone(), b.clone(), c.clone()];
        assert!(would_create_cycle(&all, a.id, c.id));
        assert!(would_create_cycle(&all, a.id, a.id));
        assert!(!would_create_cycle(&all, c.id, a.id));
    }

    #[tokio::test]
    async fn delete_refused_with_subcategories() {
        let parent = fixtures::category(None);
        let child = fixtures::category(Some(parent.id));
        let db = mock_db()
            .append_query_results([vec![parent.clone()]])
            .append_query_results([vec![child]])
            .into_connection();
        let moderator = Actor::new(Uuid::new_v4(), Role::Moderador);
        let err = delete(&db, &moderator, parent.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn clients_cannot_create_categories() {
        let db = mock_db().into_connection();
        let client = Actor::new(Uuid::new_v4(), Role::Cliente);
        let input = CategoryInput { name: "Jardinagem".into(), description: None, parent_id: None };
        assert!(create(&db, &client, input).await.unwrap_err().is_hidden());
    }
}
