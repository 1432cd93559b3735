use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::users::UserType;

use crate::errors::ServiceError;
use crate::users::domain::User;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub login_id: String,
    pub name: String,
    pub phone: String,
    pub password: String,
    /// Defaults to `customer`.
    #[serde(default)]
    pub user_type: Option<UserType>,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub login_id: String,
    pub password: String,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// The authenticated user behind one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub login_id: String,
    pub user_type: UserType,
}

impl Caller {
    /// Unwraps an optional caller, failing with `NotLoggedIn` for anonymous requests.
    pub fn require(caller: Option<&Caller>) -> Result<&Caller, ServiceError> {
        caller.ok_or(ServiceError::NotLoggedIn)
    }

    pub fn is_admin(&self) -> bool { self.user_type == UserType::Admin }

    pub fn is_self_or_admin(&self, user_id: Uuid) -> bool { self.is_admin() || self.user_id == user_id }
}

impl From<&User> for Caller {
    fn from(u: &User) -> Self { Caller { user_id: u.id, login_id: u.login_id.clone(), user_type: u.user_type } }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(user_type: UserType) -> Caller {
        Caller { user_id: Uuid::new_v4(), login_id: "someone".into(), user_type }
    }

    #[test]
    fn anonymous_requests_are_not_logged_in() {
        assert!(matches!(Caller::require(None), Err(ServiceError::NotLoggedIn)));
        let c = caller(UserType::Customer);
        assert_eq!(Caller::require(Some(&c)).unwrap().user_id, c.user_id);
    }

    #[test]
    fn admins_pass_ownership_checks() {
        let other = Uuid::new_v4();
        let customer = caller(UserType::Customer);
        assert!(customer.is_self_or_admin(customer.user_id));
        assert!(!customer.is_self_or_admin(other));
        assert!(caller(UserType::Admin).is_self_or_admin(other));
    }

    #[test]
    fn register_input_defaults_to_customer() {
        let input: RegisterInput = serde_json::from_str(
            r#"{"login_id":"kim_01","name":"Kim","phone":"01012345678","password":"Secret123"}"#,
        )
        .unwrap();
        assert!(input.user_type.is_none());
    }
}
