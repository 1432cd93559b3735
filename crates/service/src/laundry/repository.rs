use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Laundry, Settlement};
use crate::errors::ServiceError;

#[async_trait]
pub trait LaundryRepository: Send + Sync {
    async fn create_laundry(&self, owner_id: Uuid, name: &str, address: &str, tel: &str) -> Result<Laundry, ServiceError>;
    async fn find_laundry(&self, id: Uuid) -> Result<Option<Laundry>, ServiceError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Laundry>, ServiceError>;
    /// Newest first.
    async fn list_settlements(&self, laundry_id: Uuid) -> Result<Vec<Settlement>, ServiceError>;
}
