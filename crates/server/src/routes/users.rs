use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use common::pagination::PaginatedList;
use models::user::{self, Role};
use serde::Deserialize;
use service::services::user_service::{self, RankingEntry};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::{CurrentUser, ServerState};
use crate::routes::PageQuery;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RenameInput { pub name: String }

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RoleInput {
    #[schema(value_type = String, example = "Moderador")]
    pub role: Role,
}

#[utoipa::path(get, path = "/users", tag = "users", params(PageQuery), responses((status = 200, description = "Users page"), (status = 404, description = "Not Found")))]
pub async fn list(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Query(q), _): ApiQuery<PageQuery>) -> Result<Json<PaginatedList<user::Model>>, JsonApiError> {
    Ok(Json(user_service::list_users(&state.db, &actor, q.pagination()).await?))
}

#[utoipa::path(get, path = "/users/ranking", tag = "users", params(PageQuery), responses((status = 200, description = "Users by points")))]
pub async fn ranking(State(state): State<ServerState>, WithRejection(Query(q), _): ApiQuery<PageQuery>) -> Result<Json<PaginatedList<RankingEntry>>, JsonApiError> {
    Ok(Json(user_service::ranking(&state.db, q.pagination()).await?))
}

#[utoipa::path(get, path = "/users/{id}", tag = "users", params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, description = "Profile"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.db, &actor, id).await?))
}

#[utoipa::path(put, path = "/users/{id}", tag = "users", params(("id" = Uuid, Path, description = "User ID")), request_body = RenameInput, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(input), _): ApiJson<RenameInput>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::update_user_name(&state.db, &actor, id, &input.name).await?))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "users", params(("id" = Uuid, Path, description = "User ID")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    user_service::soft_delete_user(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(put, path = "/users/{id}/role", tag = "users", params(("id" = Uuid, Path, description = "User ID")), request_body = RoleInput, responses((status = 200, description = "Role assigned"), (status = 404, description = "Not Found")))]
pub async fn set_role(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>, WithRejection(Json(input), _): ApiJson<RoleInput>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::set_role(&state.db, &actor, id, input.role).await?))
}

#[utoipa::path(post, path = "/users/{id}/block", tag = "users", params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, description = "Blocked"), (status = 404, description = "Not Found")))]
pub async fn block(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::set_blocked(&state.db, &actor, id, true).await?))
}

#[utoipa::path(post, path = "/users/{id}/unblock", tag = "users", params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, description = "Unblocked"), (status = 404, description = "Not Found")))]
pub async fn unblock(State(state): State<ServerState>, CurrentUser(actor): CurrentUser, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::set_blocked(&state.db, &actor, id, false).await?))
}
