pub mod auth;
pub mod categories;
pub mod comments;
pub mod complaints;
pub mod content;
pub mod formations;
pub mod gamification;
pub mod notifications;
pub mod requisitions;
pub mod services;
pub mod users;

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::{pagination::Pagination, types::Health};

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use auth::ServerState;

/// Extractors whose rejections render through [`JsonApiError`].
pub type ApiJson<T> = WithRejection<Json<T>, JsonApiError>;
pub type ApiPath<T> = WithRejection<Path<T>, JsonApiError>;
pub type ApiQuery<T> = WithRejection<Query<T>, JsonApiError>;

/// `?page=&per_page=` on list endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page index
    pub page: Option<u32>,
    /// Items per page, 1..=100
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition of the service counters.
#[utoipa::path(get, path = "/metrics", tag = "health", responses((status = 200, description = "Prometheus text format")))]
pub async fn metrics() -> impl IntoResponse {
    match service::metrics::encode_metrics() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body),
        Err(e) => {
            error!(err = %e, "metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, [(header::CONTENT_TYPE, "text/plain")], String::new())
        }
    }
}

fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/users", get(users::list))
        .route("/users/ranking", get(users::ranking))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/users/:id/role", put(users::set_role))
        .route("/users/:id/block", post(users::block))
        .route("/users/:id/unblock", post(users::unblock))
}

fn category_routes() -> Router<ServerState> {
    Router::new()
        .route("/categories", get(categories::tree).post(categories::create))
        .route("/categories/:id", get(categories::get).put(categories::update).delete(categories::delete))
}

fn service_routes() -> Router<ServerState> {
    Router::new()
        .route("/services", get(services::list).post(services::create))
        .route("/services/mine", get(services::mine))
        .route("/services/:id", get(services::get).put(services::update).delete(services::delete))
        .route("/services/:id/activate", post(services::activate))
        .route("/services/:id/deactivate", post(services::deactivate))
        .route("/services/:id/block", post(services::block))
        .route("/services/:id/unblock", post(services::unblock))
        .route("/services/:id/comments", get(services::comments))
        .route("/services/:id/commentable", get(services::commentable))
}

fn requisition_routes() -> Router<ServerState> {
    Router::new()
        .route("/requisitions", post(requisitions::create))
        .route("/requisitions/made", get(requisitions::made))
        .route("/requisitions/received", get(requisitions::received))
        .route("/requisitions/:id", get(requisitions::get))
        .route("/requisitions/:id/:event", post(requisitions::transition))
}

fn comment_routes() -> Router<ServerState> {
    Router::new()
        .route("/comments", post(comments::create))
        .route("/comments/:id", get(comments::get).put(comments::update).delete(comments::remove))
}

fn gamification_routes() -> Router<ServerState> {
    Router::new()
        .route("/gamification", get(gamification::list).post(gamification::create))
        .route("/gamification/:id", get(gamification::get).put(gamification::update).delete(gamification::delete))
        .route("/gamification/:id/activate", post(gamification::activate))
        .route("/gamification/:id/deactivate", post(gamification::deactivate))
}

fn complaint_routes() -> Router<ServerState> {
    Router::new()
        .route("/complaints", post(complaints::file))
        .route("/complaints/mine", get(complaints::mine))
        .route("/complaints/all", get(complaints::all))
        .route("/complaints/:id", get(complaints::get).delete(complaints::delete))
        .route("/complaints/:id/:outcome", post(complaints::handle))
}

fn formation_routes() -> Router<ServerState> {
    Router::new()
        .route("/formations", get(formations::list).post(formations::create))
        .route("/formations/:id", get(formations::get).put(formations::update).delete(formations::delete))
        .route("/formations/:id/enroll", post(formations::enroll).delete(formations::withdraw))
        .route("/formations/:id/enrollments", get(formations::enrollments))
}

fn notification_routes() -> Router<ServerState> {
    Router::new()
        .route("/notifications", get(notifications::list))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", post(notifications::read_all))
        .route("/notifications/:id", get(notifications::get).delete(notifications::delete))
        .route("/notifications/:id/read", post(notifications::mark_read))
}

fn content_routes() -> Router<ServerState> {
    Router::new()
        .route("/content/pages/:kind", get(content::page).post(content::create))
        .route("/content/sections/:id", get(content::get).put(content::update).delete(content::delete))
}

/// Build the full application router: health, metrics, docs and every entity resource.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public
        .merge(auth_routes())
        .merge(user_routes())
        .merge(category_routes())
        .merge(service_routes())
        .merge(requisition_routes())
        .merge(comment_routes())
        .merge(gamification_routes())
        .merge(complaint_routes())
        .merge(formation_routes())
        .merge(notification_routes())
        .merge(content_routes())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // failures (5xx) at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
