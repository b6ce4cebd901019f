use chrono::{DateTime, Utc};
use models::user::Role;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn repo_err(e: impl std::fmt::Display) -> AuthError {
    AuthError::Repository(e.to_string())
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser {
        id: u.id,
        email: u.email,
        name: u.name,
        role: u.role,
        is_blocked: u.is_blocked,
        failed_login_attempts: u.failed_login_attempts,
        lockout_end: u.lockout_end.map(|t| t.with_timezone(&Utc)),
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Email.eq(email.trim().to_lowercase()))
            .filter(models::user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user(&self, email: &str, name: &str, role: Role) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, email, name, role)
            .await
            .map_err(|e| match e {
                models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
                other => repo_err(other),
            })?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await.map_err(repo_err)?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm)
            .await
            .map_err(repo_err)?;
        Ok(Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm })
    }

    async fn record_failed_login(&self, user_id: Uuid) -> Result<i32, AuthError> {
        models::user::Entity::update_many()
            .col_expr(models::user::Column::FailedLoginAttempts, Expr::col(models::user::Column::FailedLoginAttempts).add(1))
            .filter(models::user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        let user = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or(AuthError::NotFound)?;
        Ok(user.failed_login_attempts)
    }

    async fn lock_until(&self, user_id: Uuid, until: DateTime<Utc>) -> Result<(), AuthError> {
        let am = models::user::ActiveModel {
            id: Set(user_id),
            failed_login_attempts: Set(0),
            lockout_end: Set(Some(until.into())),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        am.update(&self.db).await.map_err(repo_err)?;
        Ok(())
    }

    async fn reset_failed_logins(&self, user_id: Uuid) -> Result<(), AuthError> {
        let am = models::user::ActiveModel {
            id: Set(user_id),
            failed_login_attempts: Set(0),
            lockout_end: Set(None),
            ..Default::default()
        };
        am.update(&self.db).await.map_err(repo_err)?;
        Ok(())
    }
}
