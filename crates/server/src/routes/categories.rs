use axum::{extract::{Path, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use models::service_category;
use service::services::category_service::{self, CategoryInput, CategoryNode};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath};
use crate::routes::auth::{CurrentUser, ServerState};

#[utoipa::path(get, path = "/categories", tag = "categories", responses((status = 200, description = "Category tree")))]
pub async fn tree(State(state): State<ServerState>) -> Result<Json<Vec<CategoryNode>>, JsonApiError> {
    Ok(Json(category_service::list_tree(&state.db).await?))
}

#[utoipa::path(get, path = "/categories/{id}", tag = "categories", params(("id" = Uuid, Path, description = "Category ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<service_category::Model>, JsonApiError> {
    Ok(Json(category_service::get(&state.db, id).await?))
}

#[utoipa::path(post, path = "/categories", tag = "categories", request_body = crate::openapi::CategoryRequest, responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn create(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Json(input), _): ApiJson<CategoryInput>) -> Result<Json<service_category::Model>, JsonApiError> {
    Ok(Json(category_service::create(&state.db, &actor, input).await?))
}

#[utoipa::path(put, path = "/categories/{id}", tag = "categories", params(("id" = Uuid, Path, description = "Category ID")), request_body = crate::openapi::CategoryRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(input), _): ApiJson<CategoryInput>) -> Result<Json<service_category::Model>, JsonApiError> {
    Ok(Json(category_service::update(&state.db, &actor, id, input).await?))
}

#[utoipa::path(delete, path = "/categories/{id}", tag = "categories", params(("id" = Uuid, Path, description = "Category ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Still in use")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    category_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
