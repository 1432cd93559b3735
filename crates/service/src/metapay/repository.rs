use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Metapay, PayAccount, PayLog};
use crate::errors::ServiceError;

#[async_trait]
pub trait MetapayRepository: Send + Sync {
    /// Opens a zero-balance wallet for the user.
    async fn create_metapay(&self, user_id: Uuid) -> Result<Metapay, ServiceError>;
    /// The user's wallet with its linked pay accounts.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Metapay>, ServiceError>;
    async fn add_pay_account(&self, metapay_id: Uuid, bank_id: i16, account_number: &str) -> Result<PayAccount, ServiceError>;
    /// Credits `amount` and records a `charge` log row atomically.
    async fn charge(&self, metapay_id: Uuid, pay_account_id: Uuid, amount: i64) -> Result<Metapay, ServiceError>;
    /// Newest first.
    async fn list_logs(&self, metapay_id: Uuid) -> Result<Vec<PayLog>, ServiceError>;
}
