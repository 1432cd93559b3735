//! Create `book` (booking) table referencing the customer and the shop.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Book::Table)
                    .if_not_exists()
                    .col(uuid(Book::Id).primary_key())
                    .col(uuid(Book::UserId))
                    .col(uuid(Book::LaundryId))
                    .col(integer(Book::BookCount).check(Expr::col(Book::BookCount).gt(0)))
                    .col(text_null(Book::Memo))
                    .col(string_len(Book::Method, 16))
                    .col(big_integer(Book::TotalFee).check(Expr::col(Book::TotalFee).gte(0)))
                    .col(string_len(Book::State, 16))
                    .col(timestamp_with_time_zone(Book::CreatedAt))
                    .col(timestamp_with_time_zone(Book::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_user")
                            .from(Book::Table, Book::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_laundry")
                            .from(Book::Table, Book::LaundryId)
                            .to(Laundry::Table, Laundry::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Book::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Book { Table, Id, UserId, LaundryId, BookCount, Memo, Method, TotalFee, State, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Laundry { Table, Id }
