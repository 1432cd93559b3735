//! HS256 bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::Caller;
use super::errors::AuthError;
use crate::users::domain::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Login id.
    pub sub: String,
    pub uid: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn issue(secret: &str, user: &User, ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.login_id.clone(),
        uid: user.id.to_string(),
        role: user.user_type.as_str().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Decodes and validates a token. Any failure, including expiry, is `Unauthorized`.
pub fn verify(secret: &str, token: &str) -> Result<Caller, AuthError> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::new(Algorithm::HS256))
        .map_err(|_| AuthError::Unauthorized)?;
    let claims = data.claims;
    let user_id = Uuid::parse_str(&claims.uid).map_err(|_| AuthError::Unauthorized)?;
    let user_type = claims.role.parse().map_err(|_| AuthError::Unauthorized)?;
    Ok(Caller { user_id, login_id: claims.sub, user_type })
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::users::UserType;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            login_id: "owner_lee".into(),
            name: "Lee".into(),
            phone: "01055556666".into(),
            user_type: UserType::Owner,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_identifies_the_user() {
        let u = user();
        let token = issue("0123456789abcdef", &u, Duration::hours(1)).unwrap();
        let caller = verify("0123456789abcdef", &token).unwrap();
        assert_eq!(caller.user_id, u.id);
        assert_eq!(caller.login_id, "owner_lee");
        assert_eq!(caller.user_type, UserType::Owner);
    }

    #[test]
    fn wrong_secret_or_expired_token_is_rejected() {
        let u = user();
        let token = issue("0123456789abcdef", &u, Duration::hours(1)).unwrap();
        assert!(matches!(verify("another-secret-value", &token), Err(AuthError::Unauthorized)));

        let expired = issue("0123456789abcdef", &u, Duration::hours(-2)).unwrap();
        assert!(matches!(verify("0123456789abcdef", &expired), Err(AuthError::Unauthorized)));
        assert!(matches!(verify("0123456789abcdef", "not-a-jwt"), Err(AuthError::Unauthorized)));
    }
}
