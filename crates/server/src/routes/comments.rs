use axum::{extract::{Path, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use models::comment_evaluation;
use service::services::comment_service::{self, CommentEdit, CommentInput};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath};
use crate::routes::auth::{CurrentUser, ServerState};

#[utoipa::path(post, path = "/comments", tag = "comments", request_body = crate::openapi::CommentRequest, responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"), (status = 409, description = "Already commented")))]
pub async fn create(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Json(input), _): ApiJson<CommentInput>) -> Result<Json<comment_evaluation::Model>, JsonApiError> {
    Ok(Json(comment_service::create(&state.db, &actor, input).await?))
}

#[utoipa::path(get, path = "/comments/{id}", tag = "comments", params(("id" = Uuid, Path, description = "Comment ID")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<comment_evaluation::Model>, JsonApiError> {
    Ok(Json(comment_service::get(&state.db, id).await?))
}

#[utoipa::path(put, path = "/comments/{id}", tag = "comments", params(("id" = Uuid, Path, description = "Comment ID")), request_body = crate::openapi::CommentEditRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(edit), _): ApiJson<CommentEdit>) -> Result<Json<comment_evaluation::Model>, JsonApiError> {
    Ok(Json(comment_service::update(&state.db, &actor, id, edit).await?))
}

#[utoipa::path(delete, path = "/comments/{id}", tag = "comments", params(("id" = Uuid, Path, description = "Comment ID")), responses((status = 204, description = "Removed"), (status = 404, description = "Not Found")))]
pub async fn remove(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    comment_service::remove(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
