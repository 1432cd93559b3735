//! Create `users` table.
//!
//! `login_id` is the handle used to sign in; `user_type` is one of
//! `customer`, `owner`, `admin`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::LoginId, 32).unique_key())
                    .col(string_len(Users::Name, 64))
                    .col(string_len(Users::Phone, 16))
                    .col(string_len(Users::UserType, 16))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, LoginId, Name, Phone, UserType, CreatedAt, UpdatedAt }
