use axum::{extract::{Path, Query, State}, Json};
use axum_extra::extract::WithRejection;
use common::pagination::PaginatedList;
use models::service_requisition::{self, RequisitionStatus};
use serde::Deserialize;
use service::requisition::RequisitionEvent;
use service::services::requisition_service::{self, RequisitionInput};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::{CurrentUser, ServerState};
use crate::routes::PageQuery;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReceivedQuery {
    /// Pending, Accepted, Rejected, Concluded or Cancelled
    #[param(value_type = Option<String>)]
    pub status: Option<RequisitionStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/requisitions/made", tag = "requisitions", params(PageQuery), responses((status = 200, description = "Requisitions the caller made")))]
pub async fn made(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<PageQuery>) -> Result<Json<PaginatedList<service_requisition::Model>>, JsonApiError> {
    Ok(Json(requisition_service::list_made(&state.db, &actor, q.pagination()).await?))
}

#[utoipa::path(get, path = "/requisitions/received", tag = "requisitions", params(ReceivedQuery), responses((status = 200, description = "Requisitions against the caller's services")))]
pub async fn received(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<ReceivedQuery>) -> Result<Json<PaginatedList<service_requisition::Model>>, JsonApiError> {
    let page = PageQuery { page: q.page, per_page: q.per_page }.pagination();
    Ok(Json(requisition_service::list_received(&state.db, &actor, q.status, page).await?))
}

#[utoipa::path(post, path = "/requisitions", tag = "requisitions", request_body = crate::openapi::RequisitionRequest, responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn create(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Json(input), _): ApiJson<RequisitionInput>) -> Result<Json<service_requisition::Model>, JsonApiError> {
    Ok(Json(requisition_service::create(&state.db, &state.notifier, &actor, input).await?))
}

#[utoipa::path(get, path = "/requisitions/{id}", tag = "requisitions", params(("id" = Uuid, Path, description = "Requisition ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<service_requisition::Model>, JsonApiError> {
    Ok(Json(requisition_service::get(&state.db, &actor, id).await?))
}

/// accept / reject / conclude (provider) or cancel (requisitioner).
#[utoipa::path(post, path = "/requisitions/{id}/{event}", tag = "requisitions", params(("id" = Uuid, Path, description = "Requisition ID"), ("event" = String, Path, description = "accept, reject, conclude or cancel")), responses((status = 200, description = "Transitioned"), (status = 404, description = "Not Found")))]
pub async fn transition(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path((id, event)), _): ApiPath<(Uuid, RequisitionEvent)>) -> Result<Json<service_requisition::Model>, JsonApiError> {
    Ok(Json(requisition_service::transition(&state.db, &state.notifier, &actor, id, event).await?))
}
