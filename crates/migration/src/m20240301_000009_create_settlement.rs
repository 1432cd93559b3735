//! Create `settlement`: one row per completed booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Settlement::Table)
                    .if_not_exists()
                    .col(uuid(Settlement::Id).primary_key())
                    .col(uuid(Settlement::BookId).unique_key())
                    .col(uuid(Settlement::LaundryId))
                    .col(big_integer(Settlement::Amount))
                    .col(timestamp_with_time_zone(Settlement::SettledAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_settlement_book")
                            .from(Settlement::Table, Settlement::BookId)
                            .to(Book::Table, Book::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_settlement_laundry")
                            .from(Settlement::Table, Settlement::LaundryId)
                            .to(Laundry::Table, Laundry::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Settlement::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Settlement { Table, Id, BookId, LaundryId, Amount, SettledAt }

#[derive(DeriveIden)]
enum Book { Table, Id }

#[derive(DeriveIden)]
enum Laundry { Table, Id }
