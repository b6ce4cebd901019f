use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{gamification, service_requisition};

fn config(active: bool) -> gamification::Model {
    let now = Utc::now().into();
    gamification::Model {
        id: Uuid::new_v4(),
        name: "Default".into(),
        points_per_comment: 5,
        points_per_evaluation: 3,
        points_per_service: 10,
        is_active: active,
        last_updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn find_active_returns_the_active_row() {
    let active = config(true);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![active.clone()]])
        .into_connection();
    let found = gamification::find_active(&db).await.unwrap();
    assert_eq!(found, Some(active));
}

#[tokio::test]
async fn find_active_is_none_without_active_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<gamification::Model>::new()])
        .into_connection();
    assert!(gamification::find_active(&db).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_points_never_reach_the_database() {
    // no query results queued: any statement would fail the test with a Db error
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let err = gamification::create(&db, "Bad", -5, 0, 0, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
}

#[tokio::test]
async fn new_requisition_starts_pending() {
    let now = Utc::now().into();
    let row = service_requisition::Model {
        id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        requisitioner_id: Uuid::new_v4(),
        status: service_requisition::RequisitionStatus::Pending,
        additional_info: Some("Sábado de manhã".into()),
        created_at: now,
        updated_at: now,
        conclusion_date: None,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();
    let created = service_requisition::create(&db, row.service_id, row.requisitioner_id, row.additional_info.clone()).await.unwrap();
    assert_eq!(created.status, service_requisition::RequisitionStatus::Pending);
    assert!(created.conclusion_date.is_none());
}
