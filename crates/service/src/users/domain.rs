use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::users::UserType;

/// Domain user (business view, without credentials)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub login_id: String,
    pub name: String,
    pub phone: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login_id: String,
    pub name: String,
    pub phone: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
}
