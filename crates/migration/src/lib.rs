//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_service_category;
mod m20240101_000004_create_service;
mod m20240101_000005_create_service_requisition;
mod m20240101_000006_create_comment_evaluation;
mod m20240101_000007_create_gamification;
mod m20240101_000008_create_complaint;
mod m20240101_000009_create_formation;
mod m20240101_000010_create_enrollment;
mod m20240101_000011_create_notification;
mod m20240101_000012_create_content_section;
mod m20240101_000020_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_service_category::Migration),
            Box::new(m20240101_000004_create_service::Migration),
            Box::new(m20240101_000005_create_service_requisition::Migration),
            Box::new(m20240101_000006_create_comment_evaluation::Migration),
            Box::new(m20240101_000007_create_gamification::Migration),
            Box::new(m20240101_000008_create_complaint::Migration),
            Box::new(m20240101_000009_create_formation::Migration),
            Box::new(m20240101_000010_create_enrollment::Migration),
            Box::new(m20240101_000011_create_notification::Migration),
            Box::new(m20240101_000012_create_content_section::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000020_add_indexes::Migration),
        ]
    }
}
