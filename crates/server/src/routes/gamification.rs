use axum::{extract::{Path, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use models::gamification;
use service::services::gamification_service::{self, GamificationInput};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath};
use crate::routes::auth::{CurrentUser, ServerState};

#[utoipa::path(get, path = "/gamification", tag = "gamification", responses((status = 200, description = "Configurations"), (status = 404, description = "Not Found")))]
pub async fn list(State(state): State<ServerState>, CurrentUser(actor): CurrentUser) -> Result<Json<Vec<gamification::Model>>, JsonApiError> {
    Ok(Json(gamification_service::list(&state.db, &actor).await?))
}

#[utoipa::path(get, path = "/gamification/{id}", tag = "gamification", params(("id" = Uuid, Path, description = "Configuration ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<gamification::Model>, JsonApiError> {
    Ok(Json(gamification_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/gamification", tag = "gamification", request_body = crate::openapi::GamificationRequest, responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn create(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Json(input), _): ApiJson<GamificationInput>) -> Result<Json<gamification::Model>, JsonApiError> {
    Ok(Json(gamification_service::create(&state.db, &actor, input).await?))
}

#[utoipa::path(put, path = "/gamification/{id}", tag = "gamification", params(("id" = Uuid, Path, description = "Configuration ID")), request_body = crate::openapi::GamificationRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(input), _): ApiJson<GamificationInput>) -> Result<Json<gamification::Model>, JsonApiError> {
    Ok(Json(gamification_service::update(&state.db, &actor, id, input).await?))
}

#[utoipa::path(delete, path = "/gamification/{id}", tag = "gamification", params(("id" = Uuid, Path, description = "Configuration ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    gamification_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Make this configuration the only active one.
#[utoipa::path(post, path = "/gamification/{id}/activate", tag = "gamification", params(("id" = Uuid, Path, description = "Configuration ID")), responses((status = 200, description = "Activated"), (status = 404, description = "Not Found")))]
pub async fn activate(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<gamification::Model>, JsonApiError> {
    Ok(Json(gamification_service::activate(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/gamification/{id}/deactivate", tag = "gamification", params(("id" = Uuid, Path, description = "Configuration ID")), responses((status = 200, description = "Deactivated"), (status = 404, description = "Not Found")))]
pub async fn deactivate(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<gamification::Model>, JsonApiError> {
    Ok(Json(gamification_service::deactivate(&state.db, &actor, id).await?))
}
