use std::sync::Arc;

use tracing::{info, instrument};

use models::catalog::validate_bank;
use models::pay_account::validate_account_number;

use super::domain::{ChargeInput, Metapay, NewPayAccount, PayAccount, PayLog};
use super::repository::MetapayRepository;
use crate::auth::domain::Caller;
use crate::errors::ServiceError;

/// Upper bound for a single charge.
pub const MAX_CHARGE: i64 = 100_000_000;

pub struct MetapayService {
    repo: Arc<dyn MetapayRepository>,
}

impl MetapayService {
    pub fn new(repo: Arc<dyn MetapayRepository>) -> Self { Self { repo } }

    async fn wallet_of(&self, caller: &Caller) -> Result<Metapay, ServiceError> {
        self.repo.find_by_user(caller.user_id).await?.ok_or_else(|| ServiceError::not_found("metapay account"))
    }

    #[instrument(skip(self, caller))]
    pub async fn open_metapay(&self, caller: Option<&Caller>) -> Result<Metapay, ServiceError> {
        let caller = Caller::require(caller)?;
        let opened = || ServiceError::Validation("metapay account already opened".into());
        if self.repo.find_by_user(caller.user_id).await?.is_some() {
            return Err(opened());
        }
        // a concurrent open can still win the unique key on user_id
        let wallet = self.repo.create_metapay(caller.user_id).await.map_err(|e| if e.is_conflict() { opened() } else { e })?;
        info!(metapay_id = %wallet.id, user_id = %caller.user_id, "metapay_opened");
        Ok(wallet)
    }

    pub async fn get_metapay(&self, caller: Option<&Caller>) -> Result<Metapay, ServiceError> {
        let caller = Caller::require(caller)?;
        self.wallet_of(caller).await
    }

    #[instrument(skip(self, caller, input))]
    pub async fn link_pay_account(&self, caller: Option<&Caller>, input: NewPayAccount) -> Result<PayAccount, ServiceError> {
        let bank_id = input.bank_id.ok_or_else(|| ServiceError::not_filled("bank_id"))?;
        let number = input
            .account_number
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::not_filled("account_number"))?;
        let caller = Caller::require(caller)?;
        validate_bank(bank_id)?;
        validate_account_number(&number)?;

        let wallet = self.wallet_of(caller).await?;
        let account = self.repo.add_pay_account(wallet.id, bank_id, &number).await?;
        info!(metapay_id = %wallet.id, pay_account_id = %account.id, bank = %account.bank_name, "pay_account_linked");
        Ok(account)
    }

    /// Top up the caller's wallet from one of its linked accounts.
    #[instrument(skip(self, caller, input))]
    pub async fn charge(&self, caller: Option<&Caller>, input: ChargeInput) -> Result<Metapay, ServiceError> {
        let pay_account_id = input.pay_account_id.ok_or_else(|| ServiceError::not_filled("pay_account_id"))?;
        let amount = input.amount.ok_or_else(|| ServiceError::not_filled("amount"))?;
        let caller = Caller::require(caller)?;
        if amount <= 0 || amount > MAX_CHARGE {
            return Err(ServiceError::Validation(format!("charge amount must be within 1..={MAX_CHARGE}")));
        }

        let wallet = self.wallet_of(caller).await?;
        if !wallet.owns_account(pay_account_id) {
            return Err(ServiceError::InvalidUser("pay account is not linked to this wallet".into()));
        }
        let wallet = self.repo.charge(wallet.id, pay_account_id, amount).await?;
        info!(metapay_id = %wallet.id, amount, balance = wallet.balance, "metapay_charged");
        Ok(wallet)
    }

    pub async fn search_pay_logs(&self, caller: Option<&Caller>) -> Result<Vec<PayLog>, ServiceError> {
        let caller = Caller::require(caller)?;
        let wallet = self.wallet_of(caller).await?;
        self.repo.list_logs(wallet.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::MemoryStore;
    use models::pay_log::PayLogKind;
    use uuid::Uuid;
    use models::users::UserType;

    fn setup() -> (MetapayService, Caller) {
        let store = Arc::new(MemoryStore::default());
        let caller: Caller = (&store.seed_user("wallet_kim", UserType::Customer)).into();
        (MetapayService::new(store), caller)
    }

    fn account() -> NewPayAccount {
        NewPayAccount { bank_id: Some(2), account_number: Some("12345678901".into()) }
    }

    #[tokio::test]
    async fn open_link_and_charge() {
        let (svc, caller) = setup();
        let wallet = svc.open_metapay(Some(&caller)).await.unwrap();
        assert_eq!(wallet.balance, 0);

        let acc = svc.link_pay_account(Some(&caller), account()).await.unwrap();
        assert_eq!(acc.bank_name, "국민");

        let charged = svc.charge(Some(&caller), ChargeInput { pay_account_id: Some(acc.id), amount: Some(30_000) }).await.unwrap();
        assert_eq!(charged.balance, 30_000);
        assert_eq!(charged.pay_accounts.len(), 1);

        let logs = svc.search_pay_logs(Some(&caller)).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].kind, PayLogKind::Charge);
        assert_eq!(logs[0].amount, 30_000);
        assert_eq!(logs[0].balance_after, 30_000);
        assert_eq!(logs[0].pay_account_id, Some(acc.id));
    }

    #[tokio::test]
    async fn second_wallet_is_rejected() {
        let (svc, caller) = setup();
        svc.open_metapay(Some(&caller)).await.unwrap();
        assert!(matches!(svc.open_metapay(Some(&caller)).await, Err(ServiceError::Validation(_))));
    }

    /// Misses wallets on lookup, as a request racing another open would.
    struct StaleReads(MemoryStore);

    #[async_trait::async_trait]
    impl MetapayRepository for StaleReads {
        async fn create_metapay(&self, user_id: Uuid) -> Result<Metapay, ServiceError> { self.0.create_metapay(user_id).await }
        async fn find_by_user(&self, _user_id: Uuid) -> Result<Option<Metapay>, ServiceError> { Ok(None) }
        async fn add_pay_account(&self, metapay_id: Uuid, bank_id: i16, number: &str) -> Result<PayAccount, ServiceError> {
            self.0.add_pay_account(metapay_id, bank_id, number).await
        }
        async fn charge(&self, metapay_id: Uuid, pay_account_id: Uuid, amount: i64) -> Result<Metapay, ServiceError> {
            self.0.charge(metapay_id, pay_account_id, amount).await
        }
        async fn list_logs(&self, metapay_id: Uuid) -> Result<Vec<PayLog>, ServiceError> { self.0.list_logs(metapay_id).await }
    }

    #[tokio::test]
    async fn racing_second_open_is_still_a_validation_error() {
        let store = MemoryStore::default();
        let caller: Caller = (&store.seed_user("wallet_race", UserType::Customer)).into();
        let svc = MetapayService::new(Arc::new(StaleReads(store)));
        svc.open_metapay(Some(&caller)).await.unwrap();
        let second = svc.open_metapay(Some(&caller)).await;
        assert!(matches!(second, Err(ServiceError::Validation(_))), "got {second:?}");
    }

    #[tokio::test]
    async fn charge_rules() {
        let (svc, caller) = setup();
        let none = svc.charge(Some(&caller), ChargeInput { pay_account_id: Some(uuid::Uuid::new_v4()), amount: Some(10) }).await;
        assert!(matches!(none, Err(ServiceError::NotFound(_))));

        svc.open_metapay(Some(&caller)).await.unwrap();
        let acc = svc.link_pay_account(Some(&caller), account()).await.unwrap();

        let zero = svc.charge(Some(&caller), ChargeInput { pay_account_id: Some(acc.id), amount: Some(0) }).await;
        assert!(matches!(zero, Err(ServiceError::Validation(_))));

        let foreign = svc.charge(Some(&caller), ChargeInput { pay_account_id: Some(uuid::Uuid::new_v4()), amount: Some(10) }).await;
        assert!(matches!(foreign, Err(ServiceError::InvalidUser(_))));

        let missing = svc.charge(Some(&caller), ChargeInput { pay_account_id: Some(acc.id), amount: None }).await;
        assert!(matches!(missing, Err(ServiceError::NotFilledIn(_))));
    }

    #[tokio::test]
    async fn pay_account_validation() {
        let (svc, caller) = setup();
        svc.open_metapay(Some(&caller)).await.unwrap();
        let bad_bank = NewPayAccount { bank_id: Some(9), ..account() };
        assert!(svc.link_pay_account(Some(&caller), bad_bank).await.is_err());
        let bad_number = NewPayAccount { account_number: Some("12-34".into()), ..account() };
        assert!(svc.link_pay_account(Some(&caller), bad_number).await.is_err());
        assert!(matches!(svc.link_pay_account(None, account()).await, Err(ServiceError::NotLoggedIn)));
    }
}
