//! Create `pay_log`: balance-affecting transactions.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayLog::Table)
                    .if_not_exists()
                    .col(uuid(PayLog::Id).primary_key())
                    .col(uuid_null(PayLog::MetapayId))
                    .col(uuid_null(PayLog::BookId))
                    .col(uuid_null(PayLog::PayAccountId))
                    .col(string_len(PayLog::Kind, 16))
                    .col(big_integer(PayLog::Amount))
                    .col(big_integer(PayLog::BalanceAfter))
                    .col(timestamp_with_time_zone(PayLog::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pay_log_metapay")
                            .from(PayLog::Table, PayLog::MetapayId)
                            .to(Metapay::Table, Metapay::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pay_log_book")
                            .from(PayLog::Table, PayLog::BookId)
                            .to(Book::Table, Book::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pay_log_pay_account")
                            .from(PayLog::Table, PayLog::PayAccountId)
                            .to(PayAccount::Table, PayAccount::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PayLog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PayLog { Table, Id, MetapayId, BookId, PayAccountId, Kind, Amount, BalanceAfter, CreatedAt }

#[derive(DeriveIden)]
enum Metapay { Table, Id }

#[derive(DeriveIden)]
enum Book { Table, Id }

#[derive(DeriveIden)]
enum PayAccount { Table, Id }
