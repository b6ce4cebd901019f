use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::user::Role;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, email: &str, name: &str, role: Role) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;

    /// Increment the consecutive failure counter and return its new value.
    async fn record_failed_login(&self, user_id: Uuid) -> Result<i32, AuthError>;
    /// Lock the account until `until` and restart the failure count.
    async fn lock_until(&self, user_id: Uuid, until: DateTime<Utc>) -> Result<(), AuthError>;
    /// Clear the failure counter and any lockout.
    async fn reset_failed_logins(&self, user_id: Uuid) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
    }

    impl MockAuthRepository {
        fn with_user<T>(&self, user_id: Uuid, f: impl FnOnce(&mut AuthUser) -> T) -> Result<T, AuthError> {
            let mut users = self.users.lock().unwrap();
            let user = users.values_mut().find(|u| u.id == user_id).ok_or(AuthError::NotFound)?;
            Ok(f(user))
        }

        pub fn set_blocked(&self, email: &str, blocked: bool) {
            if let Some(u) = self.users.lock().unwrap().get_mut(email) {
                u.is_blocked = blocked;
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&email.to_lowercase()).cloned())
        }

        async fn create_user(&self, email: &str, name: &str, role: Role) -> Result<AuthUser, AuthError> {
            let key = email.to_lowercase();
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&key) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                email: key.clone(),
                name: name.to_string(),
                role,
                is_blocked: false,
                failed_login_attempts: 0,
                lockout_end: None,
            };
            users.insert(key, user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }

        async fn record_failed_login(&self, user_id: Uuid) -> Result<i32, AuthError> {
            self.with_user(user_id, |u| {
                u.failed_login_attempts += 1;
                u.failed_login_attempts
            })
        }

        async fn lock_until(&self, user_id: Uuid, until: DateTime<Utc>) -> Result<(), AuthError> {
            self.with_user(user_id, |u| {
                u.failed_login_attempts = 0;
                u.lockout_end = Some(until);
            })
        }

        async fn reset_failed_logins(&self, user_id: Uuid) -> Result<(), AuthError> {
            self.with_user(user_id, |u| {
                u.failed_login_attempts = 0;
                u.lockout_end = None;
            })
        }
    }
}
