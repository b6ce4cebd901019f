use sea_orm::SqlErr;
use thiserror::Error;

use crate::requisition::TransitionError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ServiceError::Conflict(detail),
            _ => ServiceError::Db(e.to_string()),
        }
    }
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// True for the variants the HTTP layer hides behind the shared NotFound body.
    pub fn is_hidden(&self) -> bool {
        matches!(self, ServiceError::NotFound(_) | ServiceError::Forbidden(_) | ServiceError::InvalidTransition(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_variants() {
        assert!(ServiceError::not_found("service").is_hidden());
        assert!(ServiceError::Forbidden("x".into()).is_hidden());
        assert!(ServiceError::InvalidTransition(TransitionError::Terminal).is_hidden());
        assert!(!ServiceError::Validation("x".into()).is_hidden());
        assert!(!ServiceError::Conflict("x".into()).is_hidden());
    }

    #[test]
    fn model_validation_is_wrapped() {
        let err: ServiceError = models::errors::ModelError::Validation("name required".into()).into();
        assert!(matches!(err, ServiceError::Model(_)));
    }

    #[test]
    fn plain_database_errors_stay_internal() {
        let err: ServiceError = sea_orm::DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, ServiceError::Db(_)));
    }
}
