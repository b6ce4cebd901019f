use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use common::pagination::PaginatedList;
use models::formation::{self, FormationInput};
use models::enrollment;
use serde::Deserialize;
use service::services::formation_service::{self, FormationDetail};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::{CurrentUser, ServerState};
use crate::routes::PageQuery;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FormationQuery {
    /// Only sessions that have not started yet
    #[serde(default)]
    pub upcoming: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/formations", tag = "formations", params(FormationQuery), responses((status = 200, description = "Formations by start date")))]
pub async fn list(State(state): State<ServerState>, CurrentUser(_actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<FormationQuery>) -> Result<Json<PaginatedList<formation::Model>>, JsonApiError> {
    let page = PageQuery { page: q.page, per_page: q.per_page }.pagination();
    Ok(Json(formation_service::list(&state.db, q.upcoming, page).await?))
}

#[utoipa::path(get, path = "/formations/{id}", tag = "formations", params(("id" = Uuid, Path, description = "Formation ID")), responses((status = 200, description = "Formation with seat counts"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<FormationDetail>, JsonApiError> {
    Ok(Json(formation_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/formations", tag = "formations", request_body = crate::openapi::FormationRequest, responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn create(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Json(input), _): ApiJson<FormationInput>) -> Result<Json<formation::Model>, JsonApiError> {
    Ok(Json(formation_service::create(&state.db, &actor, input).await?))
}

#[utoipa::path(put, path = "/formations/{id}", tag = "formations", params(("id" = Uuid, Path, description = "Formation ID")), request_body = crate::openapi::FormationRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(input), _): ApiJson<FormationInput>) -> Result<Json<formation::Model>, JsonApiError> {
    Ok(Json(formation_service::update(&state.db, &actor, id, input).await?))
}

#[utoipa::path(delete, path = "/formations/{id}", tag = "formations", params(("id" = Uuid, Path, description = "Formation ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    formation_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/formations/{id}/enroll", tag = "formations", params(("id" = Uuid, Path, description = "Formation ID")), responses((status = 200, description = "Enrolled"), (status = 400, description = "Already started"), (status = 404, description = "Not Found"), (status = 409, description = "Full or already enrolled")))]
pub async fn enroll(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<enrollment::Model>, JsonApiError> {
    Ok(Json(formation_service::enroll(&state.db, &actor, id).await?))
}

#[utoipa::path(delete, path = "/formations/{id}/enroll", tag = "formations", params(("id" = Uuid, Path, description = "Formation ID")), responses((status = 204, description = "Withdrawn"), (status = 404, description = "Not Found")))]
pub async fn withdraw(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    formation_service::withdraw(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/formations/{id}/enrollments", tag = "formations", params(("id" = Uuid, Path, description = "Formation ID")), responses((status = 200, description = "Enrollments"), (status = 404, description = "Not Found")))]
pub async fn enrollments(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<Vec<enrollment::Model>>, JsonApiError> {
    Ok(Json(formation_service::list_enrollments(&state.db, &actor, id).await?))
}
