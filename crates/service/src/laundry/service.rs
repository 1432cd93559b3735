use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::laundry::validate_tel;
use models::users::UserType;

use super::domain::{Laundry, NewLaundry, Settlement};
use super::repository::LaundryRepository;
use crate::auth::domain::Caller;
use crate::errors::ServiceError;

fn required(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::not_filled(field)),
    }
}

pub struct LaundryService {
    repo: Arc<dyn LaundryRepository>,
}

impl LaundryService {
    pub fn new(repo: Arc<dyn LaundryRepository>) -> Self { Self { repo } }

    /// Register a shop owned by the caller. Only owners and admins may do so.
    #[instrument(skip(self, caller, input))]
    pub async fn register_laundry(&self, caller: Option<&Caller>, input: NewLaundry) -> Result<Laundry, ServiceError> {
        let name = required(input.name, "name")?;
        let address = required(input.address, "address")?;
        let tel = required(input.tel, "tel")?;
        let caller = Caller::require(caller)?;
        if !matches!(caller.user_type, UserType::Owner | UserType::Admin) {
            return Err(ServiceError::InvalidUser("only shop owners can register a laundry".into()));
        }
        validate_tel(&tel)?;

        let laundry = self.repo.create_laundry(caller.user_id, &name, &address, &tel).await?;
        info!(laundry_id = %laundry.id, owner_id = %laundry.owner_id, "laundry_registered");
        Ok(laundry)
    }

    pub async fn get_laundry(&self, id: Uuid) -> Result<Laundry, ServiceError> {
        self.repo.find_laundry(id).await?.ok_or_else(|| ServiceError::not_found("laundry"))
    }

    pub async fn list_my_laundries(&self, caller: Option<&Caller>) -> Result<Vec<Laundry>, ServiceError> {
        let caller = Caller::require(caller)?;
        self.repo.list_by_owner(caller.user_id).await
    }

    pub async fn search_settlements(&self, caller: Option<&Caller>, laundry_id: Uuid) -> Result<Vec<Settlement>, ServiceError> {
        let caller = Caller::require(caller)?;
        let laundry = self.get_laundry(laundry_id).await?;
        if !caller.is_self_or_admin(laundry.owner_id) {
            return Err(ServiceError::InvalidUser("not the owner of this laundry".into()));
        }
        self.repo.list_settlements(laundry.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::MemoryStore;

    fn input() -> NewLaundry {
        NewLaundry { name: Some("Clean Bubble".into()), address: Some("Seoul Mapo-gu 12".into()), tel: Some("0212345678".into()) }
    }

    #[tokio::test]
    async fn owners_register_and_list_their_shops() {
        let store = Arc::new(MemoryStore::default());
        let svc = LaundryService::new(store.clone());
        let owner: Caller = (&store.seed_user("owner_kim", UserType::Owner)).into();

        let shop = svc.register_laundry(Some(&owner), input()).await.unwrap();
        assert_eq!(shop.owner_id, owner.user_id);
        assert_eq!(svc.get_laundry(shop.id).await.unwrap().name, "Clean Bubble");

        let mine = svc.list_my_laundries(Some(&owner)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(svc.search_settlements(Some(&owner), shop.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn registration_checks_fields_and_role() {
        let store = Arc::new(MemoryStore::default());
        let svc = LaundryService::new(store.clone());
        let customer: Caller = (&store.seed_user("cust_kim", UserType::Customer)).into();
        let owner: Caller = (&store.seed_user("owner_lee", UserType::Owner)).into();

        let res = svc.register_laundry(Some(&customer), input()).await;
        assert!(matches!(res, Err(ServiceError::InvalidUser(_))));

        let mut missing = input();
        missing.address = Some("   ".into());
        assert!(matches!(svc.register_laundry(Some(&owner), missing).await, Err(ServiceError::NotFilledIn(_))));

        let mut bad_tel = input();
        bad_tel.tel = Some("02-123".into());
        assert!(svc.register_laundry(Some(&owner), bad_tel).await.is_err());

        assert!(matches!(svc.register_laundry(None, input()).await, Err(ServiceError::NotLoggedIn)));
        assert!(matches!(svc.get_laundry(Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn settlements_are_private_to_the_owner() {
        let store = Arc::new(MemoryStore::default());
        let svc = LaundryService::new(store.clone());
        let owner: Caller = (&store.seed_user("owner_park", UserType::Owner)).into();
        let rival: Caller = (&store.seed_user("owner_choi", UserType::Owner)).into();
        let shop = svc.register_laundry(Some(&owner), input()).await.unwrap();

        let res = svc.search_settlements(Some(&rival), shop.id).await;
        assert!(matches!(res, Err(ServiceError::InvalidUser(_))));
    }
}
