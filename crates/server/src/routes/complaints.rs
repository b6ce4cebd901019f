use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use common::pagination::PaginatedList;
use models::complaint::{self, ComplaintState};
use serde::Deserialize;
use service::services::complaint_service::{self, ComplaintInput, ComplaintOutcome};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::{CurrentUser, ServerState};
use crate::routes::PageQuery;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AllQuery {
    /// Pending, Resolved or Dismissed
    #[param(value_type = Option<String>)]
    pub state: Option<ComplaintState>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolutionInput {
    pub resolution: String,
}

#[utoipa::path(get, path = "/complaints/mine", tag = "complaints", params(PageQuery), responses((status = 200, description = "Complaints filed by the caller")))]
pub async fn mine(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<PageQuery>) -> Result<Json<PaginatedList<complaint::Model>>, JsonApiError> {
    Ok(Json(complaint_service::list_mine(&state.db, &actor, q.pagination()).await?))
}

#[utoipa::path(get, path = "/complaints/all", tag = "complaints", params(AllQuery), responses((status = 200, description = "All complaints"), (status = 404, description = "Not Found")))]
pub async fn all(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<AllQuery>) -> Result<Json<PaginatedList<complaint::Model>>, JsonApiError> {
    let page = PageQuery { page: q.page, per_page: q.per_page }.pagination();
    Ok(Json(complaint_service::list_all(&state.db, &actor, q.state, page).await?))
}

#[utoipa::path(post, path = "/complaints", tag = "complaints", request_body = crate::openapi::ComplaintRequest, responses((status = 200, description = "Filed"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn file(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Json(input), _): ApiJson<ComplaintInput>) -> Result<Json<complaint::Model>, JsonApiError> {
    Ok(Json(complaint_service::file(&state.db, &actor, input).await?))
}

#[utoipa::path(get, path = "/complaints/{id}", tag = "complaints", params(("id" = Uuid, Path, description = "Complaint ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<complaint::Model>, JsonApiError> {
    Ok(Json(complaint_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(delete, path = "/complaints/{id}", tag = "complaints", params(("id" = Uuid, Path, description = "Complaint ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    complaint_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/complaints/{id}/{outcome}", tag = "complaints", params(("id" = Uuid, Path, description = "Complaint ID"), ("outcome" = String, Path, description = "resolve or dismiss")), request_body = ResolutionInput, responses((status = 200, description = "Handled"), (status = 404, description = "Not Found"), (status = 409, description = "Already handled")))]
pub async fn handle(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    WithRejection(Path((id, outcome)), _): ApiPath<(Uuid, ComplaintOutcome)>,
    WithRejection(Json(body), _): ApiJson<ResolutionInput>,
) -> Result<Json<complaint::Model>, JsonApiError> {
    Ok(Json(complaint_service::handle(&state.db, &state.notifier, &actor, id, outcome, &body.resolution).await?))
}
