use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use configs::AuthSettings;
use models::user::{self, Role};
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::errors::AuthError;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::{token, AuthConfig, AuthService};
use service::services::user_service;
use service::{Actor, Notifier, ServiceError};

use crate::errors::JsonApiError;
use crate::routes::ApiJson;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub max_failed_attempts: i32,
    pub lockout_minutes: i64,
}

impl ServerAuthConfig {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            token_ttl_hours: settings.token_ttl_hours,
            max_failed_attempts: settings.max_failed_attempts,
            lockout_minutes: settings.lockout_minutes,
        }
    }

    fn service_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: Some(self.jwt_secret.clone()),
            token_ttl_hours: self.token_ttl_hours,
            max_failed_attempts: self.max_failed_attempts,
            lockout_minutes: self.lockout_minutes,
            ..AuthConfig::default()
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub notifier: Notifier,
}

impl ServerState {
    fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        AuthService::new(Arc::new(SeaOrmAuthRepository::new(self.db.clone())), self.auth.service_config())
    }
}

/// Caller resolved from `Authorization: Bearer <token>` or the `auth_token` cookie.
pub struct CurrentUser(pub Actor);

fn bearer_or_cookie(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return value.strip_prefix("Bearer ").map(|t| t.trim().to_string());
    }
    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = JsonApiError;

    /// Verifies the token, then reloads the account so role changes, blocks and
    /// deletions apply to tokens already issued.
    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_or_cookie(parts) else {
            return Err(JsonApiError::unauthorized("missing token"));
        };
        let claims = token::verify(&state.auth.jwt_secret, &token).map_err(|e| {
            warn!(path = %parts.uri.path(), err = %e, "token validation failed");
            JsonApiError::unauthorized("invalid token")
        })?;
        let account = user::Entity::find_by_id(claims.uid)
            .one(&state.db)
            .await
            .map_err(|e| JsonApiError::from(ServiceError::from(e)))?;
        match account {
            Some(account) if account.deleted_at.is_none() => {
                if account.is_blocked {
                    return Err(AuthError::blocked().into());
                }
                Ok(CurrentUser(Actor::new(account.id, account.role)))
            }
            _ => {
                warn!(user_id = %claims.uid, "token for missing or deleted account");
                Err(JsonApiError::unauthorized("invalid token"))
            }
        }
    }
}

#[derive(Serialize)]
pub struct RegisterOutput { pub user_id: Uuid, pub role: Role }

#[derive(Serialize)]
pub struct LoginOutput { pub user_id: Uuid, pub email: String, pub name: String, pub role: Role, pub token: String }

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, WithRejection(Json(input), _): ApiJson<RegisterInput>) -> Result<Json<RegisterOutput>, JsonApiError> {
    user::validate_email(&input.email).map_err(|e| JsonApiError::validation(e.to_string()))?;
    user::validate_name(&input.name).map_err(|e| JsonApiError::validation(e.to_string()))?;
    let created = state.auth_service().register(input).await?;
    Ok(Json(RegisterOutput { user_id: created.id, role: created.role }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized"), (status = 423, description = "Locked")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, WithRejection(Json(input), _): ApiJson<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth_service().login(input).await?;
    let user = session.user;
    let Some(token) = session.token else {
        return Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Token Error", Some("token generation failed".into())));
    };
    let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, role: user.role, token };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current profile"), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, CurrentUser(actor): CurrentUser) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.db, &actor, actor.user_id).await?))
}
