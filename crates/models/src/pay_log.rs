use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// One balance-affecting transaction. `amount` is the signed delta applied to
/// the Metapay balance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pay_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub metapay_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub pay_account_id: Option<Uuid>,
    pub kind: String,
    pub amount: i64,
    pub balance_after: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(belongs_to = "super::metapay::Entity", from = "Column::MetapayId", to = "super::metapay::Column::Id")]
    Metapay,
    #[sea_orm(belongs_to = "super::book::Entity", from = "Column::BookId", to = "super::book::Column::Id")]
    Book,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayLogKind {
    Charge,
    Payment,
    Refund,
}

impl PayLogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PayLogKind::Charge => "charge",
            PayLogKind::Payment => "payment",
            PayLogKind::Refund => "refund",
        }
    }
}

impl fmt::Display for PayLogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PayLogKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "charge" => Ok(PayLogKind::Charge),
            "payment" => Ok(PayLogKind::Payment),
            "refund" => Ok(PayLogKind::Refund),
            other => Err(ModelError::Validation(format!("unknown pay log kind: {other}"))),
        }
    }
}
