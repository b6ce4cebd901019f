use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use common::pagination::PaginatedList;
use models::notification;
use serde::Serialize;
use service::services::notification_service;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiPath, ApiQuery};
use crate::routes::auth::{CurrentUser, ServerState};
use crate::routes::PageQuery;

#[derive(Serialize)]
pub struct CountBody {
    pub count: u64,
}

#[utoipa::path(get, path = "/notifications", tag = "notifications", params(PageQuery), responses((status = 200, description = "Newest first")))]
pub async fn list(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<PageQuery>) -> Result<Json<PaginatedList<notification::Model>>, JsonApiError> {
    Ok(Json(notification_service::list_for_user(&state.db, &actor, q.pagination()).await?))
}

#[utoipa::path(get, path = "/notifications/unread-count", tag = "notifications", responses((status = 200, description = "Unread count")))]
pub async fn unread_count(State(state): State<ServerState>, CurrentUser(actor): CurrentUser) -> Result<Json<CountBody>, JsonApiError> {
    let count = notification_service::unread_count(&state.db, &actor).await?;
    Ok(Json(CountBody { count }))
}

#[utoipa::path(post, path = "/notifications/read-all", tag = "notifications", responses((status = 200, description = "Number marked read")))]
pub async fn read_all(State(state): State<ServerState>, CurrentUser(actor): CurrentUser) -> Result<Json<CountBody>, JsonApiError> {
    let count = notification_service::mark_all_read(&state.db, &actor).await?;
    Ok(Json(CountBody { count }))
}

#[utoipa::path(get, path = "/notifications/{id}", tag = "notifications", params(("id" = Uuid, Path, description = "Notification ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<notification::Model>, JsonApiError> {
    Ok(Json(notification_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/notifications/{id}/read", tag = "notifications", params(("id" = Uuid, Path, description = "Notification ID")), responses((status = 200, description = "Marked read"), (status = 404, description = "Not Found")))]
pub async fn mark_read(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<notification::Model>, JsonApiError> {
    Ok(Json(notification_service::mark_read(&state.db, &actor, id).await?))
}

#[utoipa::path(delete, path = "/notifications/{id}", tag = "notifications", params(("id" = Uuid, Path, description = "Notification ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    notification_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
