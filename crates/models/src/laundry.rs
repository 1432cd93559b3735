use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "laundry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub tel: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(belongs_to = "super::users::Entity", from = "Column::OwnerId", to = "super::users::Column::Id")]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Shop numbers include area codes, so landlines are accepted.
pub fn validate_tel(tel: &str) -> Result<(), ModelError> {
    if !(9..=11).contains(&tel.len()) || !tel.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::Validation("tel must be 9..=11 digits".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    name: &str,
    address: &str,
    tel: &str,
) -> Result<Model, ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    if address.trim().is_empty() { return Err(ModelError::Validation("address required".into())); }
    validate_tel(tel)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        name: Set(name.trim().to_string()),
        address: Set(address.trim().to_string()),
        tel: Set(tel.to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
