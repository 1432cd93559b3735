use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub login_id: String,
    pub name: String,
    pub phone: String,
    pub user_type: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Customer,
    Owner,
    Admin,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Customer => "customer",
            UserType::Owner => "owner",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for UserType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(UserType::Customer),
            "owner" => Ok(UserType::Owner),
            "admin" => Ok(UserType::Admin),
            other => Err(ModelError::Validation(format!("unknown user type: {other}"))),
        }
    }
}

impl Model {
    pub fn user_type(&self) -> Result<UserType, ModelError> { self.user_type.parse() }
}

pub fn validate_login_id(login_id: &str) -> Result<(), ModelError> {
    let len = login_id.chars().count();
    if !(4..=32).contains(&len) {
        return Err(ModelError::Validation("login_id must be 4..=32 characters".into()));
    }
    if !login_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ModelError::Validation("login_id may only contain letters, digits and '_'".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    if name.chars().count() > 64 { return Err(ModelError::Validation("name too long (<=64)".into())); }
    Ok(())
}

/// Mobile numbers are stored without separators.
pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    if !(10..=11).contains(&phone.len()) || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::Validation("phone must be 10 or 11 digits".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    login_id: &str,
    name: &str,
    phone: &str,
    user_type: UserType,
) -> Result<Model, ModelError> {
    validate_login_id(login_id)?;
    validate_name(name)?;
    validate_phone(phone)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        login_id: Set(login_id.to_string()),
        name: Set(name.to_string()),
        phone: Set(phone.to_string()),
        user_type: Set(user_type.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_login_id<C: ConnectionTrait>(db: &C, login_id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::LoginId.eq(login_id)).one(db).await?)
}
