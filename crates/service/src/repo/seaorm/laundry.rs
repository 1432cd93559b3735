use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::utc;
use crate::errors::ServiceError;
use crate::laundry::domain::{Laundry, Settlement};
use crate::laundry::repository::LaundryRepository;

pub struct SeaOrmLaundryRepository {
    pub db: DatabaseConnection,
}

fn to_laundry(m: models::laundry::Model) -> Laundry {
    Laundry { id: m.id, owner_id: m.owner_id, name: m.name, address: m.address, tel: m.tel, created_at: utc(m.created_at) }
}

fn to_settlement(m: models::settlement::Model) -> Settlement {
    Settlement { id: m.id, book_id: m.book_id, laundry_id: m.laundry_id, amount: m.amount, settled_at: utc(m.settled_at) }
}

#[async_trait::async_trait]
impl LaundryRepository for SeaOrmLaundryRepository {
    async fn create_laundry(&self, owner_id: Uuid, name: &str, address: &str, tel: &str) -> Result<Laundry, ServiceError> {
        Ok(to_laundry(models::laundry::create(&self.db, owner_id, name, address, tel).await?))
    }

    async fn find_laundry(&self, id: Uuid) -> Result<Option<Laundry>, ServiceError> {
        Ok(models::laundry::Entity::find_by_id(id).one(&self.db).await?.map(to_laundry))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Laundry>, ServiceError> {
        let rows = models::laundry::Entity::find()
            .filter(models::laundry::Column::OwnerId.eq(owner_id))
            .order_by_asc(models::laundry::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_laundry).collect())
    }

    async fn list_settlements(&self, laundry_id: Uuid) -> Result<Vec<Settlement>, ServiceError> {
        let rows = models::settlement::Entity::find()
            .filter(models::settlement::Column::LaundryId.eq(laundry_id))
            .order_by_desc(models::settlement::Column::SettledAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_settlement).collect())
    }
}
