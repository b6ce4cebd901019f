use axum::{extract::{Path, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use models::content_section::{self, ContentKind};
use service::services::content_service::{self, ContentInput};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath};
use crate::routes::auth::{CurrentUser, ServerState};

#[utoipa::path(get, path = "/content/pages/{kind}", tag = "content", params(("kind" = String, Path, description = "about, norm, privacy-policy, terms-and-conditions or user-manual")), responses((status = 200, description = "Sections in display order")))]
pub async fn page(State(state): State<ServerState>, WithRejection(Path(kind), _): ApiPath<ContentKind>) -> Result<Json<Vec<content_section::Model>>, JsonApiError> {
    Ok(Json(content_service::list_by_kind(&state.db, kind).await?))
}

#[utoipa::path(post, path = "/content/pages/{kind}", tag = "content", params(("kind" = String, Path, description = "Page kind")), request_body = crate::openapi::ContentRequest, responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn create(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(kind), _): ApiPath<ContentKind>, WithRejection(Json(input), _): ApiJson<ContentInput>) -> Result<Json<content_section::Model>, JsonApiError> {
    Ok(Json(content_service::create(&state.db, &actor, kind, input).await?))
}

#[utoipa::path(get, path = "/content/sections/{id}", tag = "content", params(("id" = Uuid, Path, description = "Section ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<content_section::Model>, JsonApiError> {
    Ok(Json(content_service::get(&state.db, id).await?))
}

#[utoipa::path(put, path = "/content/sections/{id}", tag = "content", params(("id" = Uuid, Path, description = "Section ID")), request_body = crate::openapi::ContentRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(input), _): ApiJson<ContentInput>) -> Result<Json<content_section::Model>, JsonApiError> {
    Ok(Json(content_service::update(&state.db, &actor, id, input).await?))
}

#[utoipa::path(delete, path = "/content/sections/{id}", tag = "content", params(("id" = Uuid, Path, description = "Section ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    content_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
