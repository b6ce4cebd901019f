use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{Duration, Utc};
use configs::AuthSettings;
use models::user::Role;
use rand::rngs::OsRng;
use tracing::{info, debug, warn, instrument};

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
    pub token_ttl_hours: i64,
    pub max_failed_attempts: i32,
    pub lockout_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            password_algorithm: "argon2".into(),
            token_ttl_hours: 12,
            max_failed_attempts: 5,
            lockout_minutes: 5,
        }
    }
}

impl AuthConfig {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            jwt_secret: Some(settings.jwt_secret.clone()).filter(|s| !s.is_empty()),
            token_ttl_hours: settings.token_ttl_hours,
            max_failed_attempts: settings.max_failed_attempts,
            lockout_minutes: settings.lockout_minutes,
            ..Self::default()
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = RegisterInput { email: "user@example.com".into(), name: "Test".into(), password: "Secret123".into(), role: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let role = input.role.unwrap_or(Role::Cliente);
        if !role.is_self_assignable() {
            return Err(AuthError::Validation(format!("role {:?} cannot be self-assigned", role)));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input.email, &input.name, role).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, role = ?user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and optionally issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: Some("secret".into()), ..AuthConfig::default() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into(), role: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if user.is_blocked {
            return Err(AuthError::blocked());
        }
        let now = Utc::now();
        if let Some(until) = user.lockout_end.filter(|_| user.is_locked_out(now)) {
            return Err(AuthError::locked_out(until));
        }

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            let attempts = self.repo.record_failed_login(user.id).await?;
            if attempts >= self.cfg.max_failed_attempts {
                let until = now + Duration::minutes(self.cfg.lockout_minutes);
                self.repo.lock_until(user.id, until).await?;
                warn!(user_id = %user.id, attempts, %until, "account_locked_out");
                return Err(AuthError::locked_out(until));
            }
            return Err(AuthError::Unauthorized);
        }

        if user.failed_login_attempts > 0 || user.lockout_end.is_some() {
            self.repo.reset_failed_logins(user.id).await?;
        }

        let token = match &self.cfg.jwt_secret {
            Some(secret) => Some(token::issue(secret, &user, self.cfg.token_ttl_hours)?),
            None => None,
        };
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user: AuthUser { failed_login_attempts: 0, lockout_end: None, ..user }, token })
    }
}
