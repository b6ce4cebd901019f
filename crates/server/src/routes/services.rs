use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use common::pagination::PaginatedList;
use models::{comment_evaluation, service as listing, service_requisition};
use serde::{Deserialize, Serialize};
use service::services::comment_service::{self, RatingSummary};
use service::services::listing_service::{self, ListingFilter, ServiceInput};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::{CurrentUser, ServerState};
use crate::routes::PageQuery;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    pub category_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize)]
pub struct CommentsPage {
    pub summary: RatingSummary,
    #[serde(flatten)]
    pub page: PaginatedList<comment_evaluation::Model>,
}

#[utoipa::path(get, path = "/services", tag = "services", params(ListingQuery), responses((status = 200, description = "Requestable services")))]
pub async fn list(State(state): State<ServerState>, WithRejection(Query(q), _): ApiQuery<ListingQuery>) -> Result<Json<PaginatedList<listing::Model>>, JsonApiError> {
    let filter = ListingFilter { category_id: q.category_id, provider_id: q.provider_id };
    let page = PageQuery { page: q.page, per_page: q.per_page }.pagination();
    Ok(Json(listing_service::list_public(&state.db, filter, page).await?))
}

#[utoipa::path(get, path = "/services/mine", tag = "services", params(PageQuery), responses((status = 200, description = "Caller's services")))]
pub async fn mine(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<PageQuery>) -> Result<Json<PaginatedList<listing::Model>>, JsonApiError> {
    Ok(Json(listing_service::list_mine(&state.db, &actor, q.pagination()).await?))
}

#[utoipa::path(get, path = "/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, actor: Option<CurrentUser>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<listing::Model>, JsonApiError> {
    let actor = actor.map(|CurrentUser(a)| a);
    Ok(Json(listing_service::get(&state.db, actor.as_ref(), id).await?))
}

#[utoipa::path(post, path = "/services", tag = "services", request_body = crate::openapi::ServiceRequest, responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn create(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Json(input), _): ApiJson<ServiceInput>) -> Result<Json<listing::Model>, JsonApiError> {
    Ok(Json(listing_service::create(&state.db, &actor, input).await?))
}

#[utoipa::path(put, path = "/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), request_body = crate::openapi::ServiceRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(input), _): ApiJson<ServiceInput>) -> Result<Json<listing::Model>, JsonApiError> {
    Ok(Json(listing_service::update(&state.db, &actor, id, input).await?))
}

#[utoipa::path(delete, path = "/services/{id}", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Open requisitions")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    listing_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/services/{id}/activate", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 200, description = "Activated"), (status = 404, description = "Not Found")))]
pub async fn activate(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<listing::Model>, JsonApiError> {
    Ok(Json(listing_service::set_active(&state.db, &actor, id, true).await?))
}

#[utoipa::path(post, path = "/services/{id}/deactivate", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 200, description = "Deactivated"), (status = 404, description = "Not Found")))]
pub async fn deactivate(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<listing::Model>, JsonApiError> {
    Ok(Json(listing_service::set_active(&state.db, &actor, id, false).await?))
}

#[utoipa::path(post, path = "/services/{id}/block", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 200, description = "Blocked"), (status = 404, description = "Not Found")))]
pub async fn block(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<listing::Model>, JsonApiError> {
    Ok(Json(listing_service::set_blocked(&state.db, &actor, id, true).await?))
}

#[utoipa::path(post, path = "/services/{id}/unblock", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 200, description = "Unblocked"), (status = 404, description = "Not Found")))]
pub async fn unblock(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<listing::Model>, JsonApiError> {
    Ok(Json(listing_service::set_blocked(&state.db, &actor, id, false).await?))
}

#[utoipa::path(get, path = "/services/{id}/comments", tag = "services", params(("id" = Uuid, Path, description = "Service ID"), PageQuery), responses((status = 200, description = "Comments with rating summary")))]
pub async fn comments(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Query(q), _): ApiQuery<PageQuery>) -> Result<Json<CommentsPage>, JsonApiError> {
    let (summary, page) = comment_service::list_for_service(&state.db, id, q.pagination()).await?;
    Ok(Json(CommentsPage { summary, page }))
}

/// The concluded requisition the caller can still comment on, or 404.
#[utoipa::path(get, path = "/services/{id}/commentable", tag = "services", params(("id" = Uuid, Path, description = "Service ID")), responses((status = 200, description = "Requisition open for comment"), (status = 404, description = "Not Found")))]
pub async fn commentable(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<service_requisition::Model>, JsonApiError> {
    comment_service::commentable_requisition(&state.db, &actor, id)
        .await?
        .map(Json)
        .ok_or_else(JsonApiError::not_found)
}
