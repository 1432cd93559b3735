use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use models::users::{validate_name, validate_phone, UserType};

use super::domain::{ProfileUpdate, User};
use super::repository::UserRepository;
use crate::auth::domain::Caller;
use crate::errors::ServiceError;

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self { Self { repo } }

    /// Fetch one user; callers may read their own record, admins any record.
    pub async fn get_user(&self, caller: Option<&Caller>, id: Uuid) -> Result<User, ServiceError> {
        let caller = Caller::require(caller)?;
        if !caller.is_self_or_admin(id) {
            return Err(ServiceError::InvalidUser("cannot read another user's profile".into()));
        }
        self.repo.find_user(id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    #[instrument(skip(self, caller, update), fields(user_id = %id))]
    pub async fn update_profile(&self, caller: Option<&Caller>, id: Uuid, update: ProfileUpdate) -> Result<User, ServiceError> {
        if update.name.is_none() && update.phone.is_none() {
            return Err(ServiceError::not_filled("name or phone"));
        }
        let caller = Caller::require(caller)?;
        if !caller.is_self_or_admin(id) {
            return Err(ServiceError::InvalidUser("cannot edit another user's profile".into()));
        }
        let update = ProfileUpdate {
            name: update.name.map(|n| n.trim().to_string()),
            phone: update.phone.map(|p| p.trim().to_string()),
        };
        if let Some(name) = &update.name { validate_name(name)?; }
        if let Some(phone) = &update.phone { validate_phone(phone)?; }

        let user = self.repo.update_profile(id, update).await?;
        info!(user_id = %user.id, "profile_updated");
        Ok(user)
    }

    /// Admin listing, optionally narrowed to one user type.
    pub async fn search_users(&self, caller: Option<&Caller>, user_type: Option<UserType>) -> Result<Vec<User>, ServiceError> {
        let caller = Caller::require(caller)?;
        if !caller.is_admin() {
            return Err(ServiceError::InvalidUser("admin only".into()));
        }
        self.repo.list_users(user_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, UserService) {
        let store = Arc::new(MemoryStore::default());
        (store.clone(), UserService::new(store))
    }

    #[tokio::test]
    async fn users_read_only_themselves_unless_admin() {
        let (store, svc) = setup();
        let kim = store.seed_user("kim_cust", UserType::Customer);
        let lee = store.seed_user("lee_cust", UserType::Customer);
        let admin = store.seed_user("the_admin", UserType::Admin);

        assert_eq!(svc.get_user(Some(&(&kim).into()), kim.id).await.unwrap().login_id, "kim_cust");
        assert!(matches!(svc.get_user(Some(&(&kim).into()), lee.id).await, Err(ServiceError::InvalidUser(_))));
        assert!(svc.get_user(Some(&(&admin).into()), lee.id).await.is_ok());
        assert!(matches!(svc.get_user(None, kim.id).await, Err(ServiceError::NotLoggedIn)));
        assert!(matches!(svc.get_user(Some(&(&admin).into()), Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn profile_update_validates_fields() {
        let (store, svc) = setup();
        let kim = store.seed_user("kim_prof", UserType::Customer);
        let caller: Caller = (&kim).into();

        let empty = svc.update_profile(Some(&caller), kim.id, ProfileUpdate::default()).await;
        assert!(matches!(empty, Err(ServiceError::NotFilledIn(_))));

        let bad = ProfileUpdate { name: None, phone: Some("12".into()) };
        assert!(svc.update_profile(Some(&caller), kim.id, bad).await.is_err());

        let ok = ProfileUpdate { name: Some("  Kim Minsu ".into()), phone: Some("01077778888".into()) };
        let updated = svc.update_profile(Some(&caller), kim.id, ok).await.unwrap();
        assert_eq!(updated.name, "Kim Minsu");
        assert_eq!(updated.phone, "01077778888");
    }

    #[tokio::test]
    async fn search_users_is_admin_only() {
        let (store, svc) = setup();
        let owner = store.seed_user("owner_a", UserType::Owner);
        store.seed_user("cust_a", UserType::Customer);
        let admin = store.seed_user("admin_a", UserType::Admin);

        assert!(matches!(svc.search_users(Some(&(&owner).into()), None).await, Err(ServiceError::InvalidUser(_))));
        let all = svc.search_users(Some(&(&admin).into()), None).await.unwrap();
        assert_eq!(all.len(), 3);
        let owners = svc.search_users(Some(&(&admin).into()), Some(UserType::Owner)).await.unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].id, owner.id);
    }
}
