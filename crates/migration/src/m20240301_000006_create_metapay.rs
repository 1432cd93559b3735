//! Create `metapay` stored-balance accounts, one per user.
//!
//! The CHECK constraint keeps balances non-negative even if a debit bypasses
//! the conditional update.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Metapay::Table)
                    .if_not_exists()
                    .col(uuid(Metapay::Id).primary_key())
                    .col(uuid(Metapay::UserId).unique_key())
                    .col(big_integer(Metapay::Balance).default(0).check(Expr::col(Metapay::Balance).gte(0)))
                    .col(timestamp_with_time_zone(Metapay::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_metapay_user")
                            .from(Metapay::Table, Metapay::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Metapay::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Metapay { Table, Id, UserId, Balance, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
