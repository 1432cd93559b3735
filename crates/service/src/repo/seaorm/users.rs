use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use uuid::Uuid;

use models::users::UserType;

use super::{now, utc};
use crate::auth::domain::Credentials;
use crate::errors::ServiceError;
use crate::users::domain::{NewUser, ProfileUpdate, User};
use crate::users::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

fn to_user(m: models::users::Model) -> Result<User, ServiceError> {
    Ok(User {
        user_type: m.user_type()?,
        id: m.id,
        login_id: m.login_id,
        name: m.name,
        phone: m.phone,
        created_at: utc(m.created_at),
    })
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        models::users::Entity::find_by_id(id).one(&self.db).await?.map(to_user).transpose()
    }

    async fn find_user_by_login_id(&self, login_id: &str) -> Result<Option<User>, ServiceError> {
        models::users::find_by_login_id(&self.db, login_id).await?.map(to_user).transpose()
    }

    async fn create_user(&self, new: NewUser, password_hash: String, password_algorithm: String) -> Result<User, ServiceError> {
        let txn = self.db.begin().await?;
        let created = models::users::create(&txn, &new.login_id, &new.name, &new.phone, new.user_type).await?;
        models::user_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm).await?;
        txn.commit().await?;
        to_user(created)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, ServiceError> {
        let existing = models::users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;
        let mut am: models::users::ActiveModel = existing.into();
        if let Some(name) = update.name { am.name = Set(name); }
        if let Some(phone) = update.phone { am.phone = Set(phone); }
        am.updated_at = Set(now());
        to_user(am.update(&self.db).await?)
    }

    async fn list_users(&self, user_type: Option<UserType>) -> Result<Vec<User>, ServiceError> {
        let mut q = models::users::Entity::find().order_by_asc(models::users::Column::CreatedAt);
        if let Some(t) = user_type {
            q = q.filter(models::users::Column::UserType.eq(t.as_str()));
        }
        q.all(&self.db).await?.into_iter().map(to_user).collect()
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }
}
