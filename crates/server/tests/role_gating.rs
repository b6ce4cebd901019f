//! Router-level checks against a mocked database: role gating renders the
//! shared NotFound body and allowed roles reach the service layer.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use models::service_requisition::RequisitionStatus;
use models::user::Role;
use models::{complaint, gamification, service as listing, service_requisition, user};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use configs::{AppConfig, SmtpSettings};
use server::routes::{self, auth};
use server::startup::build_state;
use service::auth::domain::AuthUser;
use service::auth::token;
use service::mailer::mock::RecordingMailer;
use service::Notifier;

const SECRET: &str = "gating-secret";

fn app(db: DatabaseConnection) -> Router {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = SECRET.into();
    let mut state = build_state(&cfg, db);
    state.notifier = Notifier::new(Arc::new(RecordingMailer::default()), SmtpSettings::default());
    routes::build_router(state, tower_http::cors::CorsLayer::very_permissive())
}

fn bearer(id: Uuid, role: Role) -> String {
    let user = AuthUser {
        id,
        email: format!("{id}@prestar.test"),
        name: "Teste".into(),
        role,
        is_blocked: false,
        failed_login_attempts: 0,
        lockout_end: None,
    };
    format!("Bearer {}", token::issue(SECRET, &user, 1).expect("token"))
}

/// The stored account the extractor reloads for a token.
fn account(id: Uuid, role: Role) -> user::Model {
    user::Model {
        id,
        email: format!("{id}@prestar.test"),
        name: "Teste".into(),
        role,
        total_points: 0,
        is_blocked: false,
        failed_login_attempts: 0,
        lockout_end: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
        deleted_at: None,
    }
}

/// Token plus the mock database seeded with the caller's account.
fn signed_in(id: Uuid, role: Role) -> (Option<String>, MockDatabase) {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([vec![account(id, role)]]);
    (Some(bearer(id, role)), db)
}

fn request(method: &str, uri: &str, auth: Option<String>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn config_row() -> gamification::Model {
    gamification::Model {
        id: Uuid::new_v4(),
        name: "Verão".into(),
        points_per_comment: 5,
        points_per_evaluation: 3,
        points_per_service: 10,
        is_active: false,
        last_updated_by: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn gamification_body() -> Value {
    json!({"name": "Verão", "points_per_comment": 5, "points_per_evaluation": 3, "points_per_service": 10})
}

#[tokio::test]
async fn health_is_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let resp = app(db).oneshot(request("GET", "/health", None, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let resp = app(db).oneshot(request("GET", "/auth/me", None, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn moderator_cannot_create_gamification() {
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Moderador);
    let resp = app(db.into_connection())
        .oneshot(request("POST", "/gamification", auth, Some(gamification_body())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn administrator_creates_gamification() {
    let row = config_row();
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Administrador);
    let db = db.append_query_results([vec![row.clone()]]).into_connection();
    let resp = app(db)
        .oneshot(request("POST", "/gamification", auth, Some(gamification_body())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["points_per_comment"], json!(5));
}

#[tokio::test]
async fn complaint_queue_is_for_moderators() {
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Cliente);
    let resp = app(db.into_connection()).oneshot(request("GET", "/complaints/all", auth, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let row = complaint::Model {
        id: Uuid::new_v4(),
        complainant_id: Uuid::new_v4(),
        service_id: Some(Uuid::new_v4()),
        target_user_id: None,
        reason: "Serviço não prestado".into(),
        state: complaint::ComplaintState::Pending,
        resolution: None,
        handled_by: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    };
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Moderador);
    let db = db.append_query_results([vec![row]]).into_connection();
    let resp = app(db).oneshot(request("GET", "/complaints/all?per_page=10", auth, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["total_items"], json!(1));
    assert_eq!(body["has_next_page"], json!(false));
}

#[tokio::test]
async fn transition_out_of_terminal_state_is_not_found() {
    let provider = Uuid::new_v4();
    let offered = listing::Model {
        id: Uuid::new_v4(),
        provider_id: provider,
        category_id: Uuid::new_v4(),
        name: "Canalização".into(),
        description: "Reparações".into(),
        price: None,
        is_active: true,
        is_blocked: false,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    };
    let requisition = service_requisition::Model {
        id: Uuid::new_v4(),
        service_id: offered.id,
        requisitioner_id: Uuid::new_v4(),
        status: RequisitionStatus::Concluded,
        additional_info: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
        conclusion_date: Some(Utc::now().into()),
    };
    let (auth, db) = signed_in(provider, Role::Prestador);
    let db = db
        .append_query_results([vec![requisition.clone()]])
        .append_query_results([vec![offered]])
        .into_connection();
    let uri = format!("/requisitions/{}/accept", requisition.id);
    let resp = app(db).oneshot(request("POST", &uri, auth, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn unknown_requisition_event_is_not_found() {
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Cliente);
    let uri = format!("/requisitions/{}/approve", Uuid::new_v4());
    let resp = app(db.into_connection()).oneshot(request("POST", &uri, auth, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Administrador);
    let resp = app(db.into_connection()).oneshot(request("GET", "/gamification/not-a-uuid", auth, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn mistyped_json_field_is_a_validation_error() {
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Administrador);
    let resp = app(db.into_connection())
        .oneshot(request("POST", "/gamification", auth, Some(json!({"points_per_comment": "abc"}))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    let body = json_body(resp).await;
    assert_eq!(body["error"], json!("Validation Error"));
    assert!(body["errors"].as_array().is_some_and(|errors| !errors.is_empty()));
}

#[tokio::test]
async fn non_json_body_is_a_validation_error() {
    let (auth, db) = signed_in(Uuid::new_v4(), Role::Administrador);
    let req = Request::builder()
        .method("POST")
        .uri("/gamification")
        .header(header::AUTHORIZATION, auth.unwrap())
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("points"))
        .unwrap();
    let resp = app(db.into_connection()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["errors"].is_array());
}

#[tokio::test]
async fn demoted_administrator_loses_access_with_old_token() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account(id, Role::Cliente)]])
        .into_connection();
    let resp = app(db)
        .oneshot(request("GET", "/gamification", Some(bearer(id, Role::Administrador)), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn blocked_account_is_locked_out_with_valid_token() {
    let id = Uuid::new_v4();
    let blocked = user::Model { is_blocked: true, ..account(id, Role::Administrador) };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![blocked]])
        .into_connection();
    let resp = app(db)
        .oneshot(request("GET", "/gamification", Some(bearer(id, Role::Administrador)), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::LOCKED);
    assert_eq!(json_body(resp).await["reason"], json!("blocked"));
}

#[tokio::test]
async fn deleted_account_token_is_unauthorized() {
    let id = Uuid::new_v4();
    let deleted = user::Model { deleted_at: Some(Utc::now().into()), ..account(id, Role::Cliente) };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![deleted]])
        .into_connection();
    let resp = app(db).oneshot(request("GET", "/auth/me", Some(bearer(id, Role::Cliente)), None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn default_config_builds_state() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let cfg = AppConfig::default();
    let state: auth::ServerState = build_state(&cfg, db);
    assert_eq!(state.auth.max_failed_attempts, 5);
}
