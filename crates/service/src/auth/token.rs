use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use models::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::AuthUser;
use super::errors::AuthError;
use crate::access::Actor;

/// JWT payload carried by the `Authorization` header and the `auth_token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.uid, self.role)
    }
}

pub fn issue(secret: &str, user: &AuthUser, ttl_hours: i64) -> Result<String, AuthError> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = Claims { sub: user.email.clone(), uid: user.id, role: user.role, exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

pub fn verify(secret: &str, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "rita@example.com".into(),
            name: "Rita".into(),
            role,
            is_blocked: false,
            failed_login_attempts: 0,
            lockout_end: None,
        }
    }

    #[test]
    fn issued_token_carries_role() {
        let u = user(Role::Moderador);
        let token = issue("secret", &u, 1).unwrap();
        let claims = verify("secret", &token).unwrap();
        assert_eq!(claims.actor(), Actor::new(u.id, Role::Moderador));
        assert_eq!(claims.sub, "rita@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue("secret", &user(Role::Cliente), 1).unwrap();
        assert!(matches!(verify("other", &token), Err(AuthError::TokenError(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue("secret", &user(Role::Cliente), -2).unwrap();
        assert!(verify("secret", &token).is_err());
    }
}
