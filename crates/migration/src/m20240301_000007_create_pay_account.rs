//! Create `pay_account`: bank accounts linked to a Metapay account.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayAccount::Table)
                    .if_not_exists()
                    .col(uuid(PayAccount::Id).primary_key())
                    .col(uuid(PayAccount::MetapayId))
                    .col(small_integer(PayAccount::BankId))
                    .col(string_len(PayAccount::AccountNumber, 20))
                    .col(timestamp_with_time_zone(PayAccount::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pay_account_metapay")
                            .from(PayAccount::Table, PayAccount::MetapayId)
                            .to(Metapay::Table, Metapay::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PayAccount::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PayAccount { Table, Id, MetapayId, BankId, AccountNumber, CreatedAt }

#[derive(DeriveIden)]
enum Metapay { Table, Id }
