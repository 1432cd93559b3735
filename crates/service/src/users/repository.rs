use async_trait::async_trait;
use uuid::Uuid;

use models::users::UserType;

use super::domain::{NewUser, ProfileUpdate, User};
use crate::auth::domain::Credentials;
use crate::errors::ServiceError;

/// Persistence for users and their password credentials.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, ServiceError>;
    async fn find_user_by_login_id(&self, login_id: &str) -> Result<Option<User>, ServiceError>;
    /// Inserts the user together with its password credentials; a taken
    /// login id fails with `ModelError::Conflict` and nothing is written.
    async fn create_user(&self, new: NewUser, password_hash: String, password_algorithm: String) -> Result<User, ServiceError>;
    /// Applies the fields that are `Some`; fails with `NotFound` for unknown ids.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, ServiceError>;
    async fn list_users(&self, user_type: Option<UserType>) -> Result<Vec<User>, ServiceError>;
    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError>;
}
