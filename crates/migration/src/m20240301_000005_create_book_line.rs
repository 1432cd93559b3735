//! Create `book_line` table; lines are removed together with their booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookLine::Table)
                    .if_not_exists()
                    .col(uuid(BookLine::Id).primary_key())
                    .col(uuid(BookLine::BookId))
                    .col(integer(BookLine::LineNo))
                    .col(small_integer(BookLine::ClothesId))
                    .col(small_integer(BookLine::FabricId))
                    .col(big_integer(BookLine::Fee).check(Expr::col(BookLine::Fee).gte(0)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_line_book")
                            .from(BookLine::Table, BookLine::BookId)
                            .to(Book::Table, Book::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BookLine::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BookLine { Table, Id, BookId, LineNo, ClothesId, FabricId, Fee }

#[derive(DeriveIden)]
enum Book { Table, Id }
