use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use common::types::NotFoundBody;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// Body of a 423 response for blocked or locked-out accounts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LockoutBody {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

/// HTTP error with a JSON body. 404s always render the shared NotFound body.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
    pub errors: Vec<String>,
    pub lockout: Option<LockoutBody>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "no_errors")]
    errors: &'a [String],
}

fn no_errors(errors: &&[String]) -> bool {
    errors.is_empty()
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
        Self { status, title: title.to_string(), detail, errors: Vec::new(), lockout: None }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", None)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self { errors: vec![message.into()], ..Self::new(StatusCode::BAD_REQUEST, "Validation Error", None) }
    }

    pub fn unauthorized(detail: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.to_string()))
    }

    fn internal(detail: String) -> Self {
        error!(error = %detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::NOT_FOUND {
            return (self.status, Json(NotFoundBody::default())).into_response();
        }
        if let Some(lockout) = self.lockout {
            return (self.status, Json(lockout)).into_response();
        }
        let body = ErrorBody { error: &self.title, detail: self.detail.as_deref(), errors: &self.errors };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_hidden() {
            tracing::debug!(reason = %e, "hidden behind not found");
            return JsonApiError::not_found();
        }
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => JsonApiError::validation(msg),
            ServiceError::Conflict(msg) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            other => JsonApiError::internal(other.to_string()),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => JsonApiError::validation(msg),
            AuthError::Conflict => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some("user already exists".into())),
            AuthError::NotFound => JsonApiError::not_found(),
            AuthError::Unauthorized | AuthError::TokenError(_) => JsonApiError::unauthorized("invalid credentials"),
            AuthError::Locked { reason, until } => JsonApiError {
                lockout: Some(LockoutBody { reason, until }),
                ..JsonApiError::new(StatusCode::LOCKED, "Locked", None)
            },
            other => JsonApiError::internal(other.to_string()),
        }
    }
}

/// Unreadable bodies are form errors.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        JsonApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(rejection: QueryRejection) -> Self {
        JsonApiError::validation(rejection.body_text())
    }
}

/// An id or action segment that does not parse names nothing.
impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "unparsable path");
        JsonApiError::not_found()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::requisition::TransitionError;

    #[test]
    fn hidden_service_errors_become_not_found() {
        for e in [
            ServiceError::not_found("service"),
            ServiceError::Forbidden("nope".into()),
            ServiceError::InvalidTransition(TransitionError::Terminal),
        ] {
            assert_eq!(JsonApiError::from(e).status, StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn model_validation_is_bad_request_with_errors() {
        let err = JsonApiError::from(ServiceError::Model(ModelError::Validation("name required".into())));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.errors, vec!["name required".to_string()]);
    }

    #[test]
    fn lockout_maps_to_423() {
        let err = JsonApiError::from(AuthError::blocked());
        assert_eq!(err.status, StatusCode::LOCKED);
        assert_eq!(err.lockout.unwrap().reason, "blocked");
    }
}
