use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pay_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub metapay_id: Uuid,
    pub bank_id: i16,
    pub account_number: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(belongs_to = "super::metapay::Entity", from = "Column::MetapayId", to = "super::metapay::Column::Id")]
    Metapay,
}

impl Related<super::metapay::Entity> for Entity {
    fn to() -> RelationDef { Relation::Metapay.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_account_number(number: &str) -> Result<(), ModelError> {
    if !(10..=14).contains(&number.len()) || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::Validation("account_number must be 10..=14 digits".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_account_number;

    #[test]
    fn account_numbers_are_plain_digits() {
        assert!(validate_account_number("3020000012345").is_ok());
        assert!(validate_account_number("302-0000-012345").is_err());
        assert!(validate_account_number("123456789").is_err());
    }
}
