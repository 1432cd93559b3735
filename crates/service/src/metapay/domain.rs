use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::catalog::bank_name;
use models::pay_log::PayLogKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metapay {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub pay_accounts: Vec<PayAccount>,
}

impl Metapay {
    pub fn owns_account(&self, pay_account_id: Uuid) -> bool {
        self.pay_accounts.iter().any(|a| a.id == pay_account_id)
    }
}

/// Bank account linked to a wallet as a charging source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayAccount {
    pub id: Uuid,
    pub bank_id: i16,
    pub bank_name: String,
    pub account_number: String,
    pub created_at: DateTime<Utc>,
}

impl PayAccount {
    pub fn new(id: Uuid, bank_id: i16, account_number: String, created_at: DateTime<Utc>) -> Self {
        let bank_name = bank_name(bank_id).unwrap_or_default().to_string();
        Self { id, bank_id, bank_name, account_number, created_at }
    }
}

/// One balance movement. `amount` is signed: charges and refunds are
/// positive, payments negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayLog {
    pub id: Uuid,
    pub metapay_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub pay_account_id: Option<Uuid>,
    pub kind: PayLogKind,
    pub amount: i64,
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPayAccount {
    pub bank_id: Option<i16>,
    pub account_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChargeInput {
    pub pay_account_id: Option<Uuid>,
    pub amount: Option<i64>,
}
