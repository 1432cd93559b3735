//! Create `laundry` (shop) table owned by a user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Laundry::Table)
                    .if_not_exists()
                    .col(uuid(Laundry::Id).primary_key())
                    .col(uuid(Laundry::OwnerId))
                    .col(string_len(Laundry::Name, 128))
                    .col(string_len(Laundry::Address, 255))
                    .col(string_len(Laundry::Tel, 16))
                    .col(timestamp_with_time_zone(Laundry::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_laundry_owner")
                            .from(Laundry::Table, Laundry::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Laundry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Laundry { Table, Id, OwnerId, Name, Address, Tel, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
