use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Laundry: index on owner_id
        manager
            .create_index(Index::create().name("idx_laundry_owner").table(Laundry::Table).col(Laundry::OwnerId).to_owned())
            .await?;

        // Book: lookups by user, by shop, and by creation date
        manager
            .create_index(
                Index::create()
                    .name("idx_book_user_state")
                    .table(Book::Table)
                    .col(Book::UserId)
                    .col(Book::State)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_book_laundry_state")
                    .table(Book::Table)
                    .col(Book::LaundryId)
                    .col(Book::State)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(Index::create().name("idx_book_created_at").table(Book::Table).col(Book::CreatedAt).to_owned())
            .await?;

        // BookLine: unique position per booking
        manager
            .create_index(
                Index::create()
                    .name("uniq_book_line_book_no")
                    .table(BookLine::Table)
                    .col(BookLine::BookId)
                    .col(BookLine::LineNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // PayAccount / PayLog / Settlement
        manager
            .create_index(Index::create().name("idx_pay_account_metapay").table(PayAccount::Table).col(PayAccount::MetapayId).to_owned())
            .await?;
        manager
            .create_index(Index::create().name("idx_pay_log_metapay").table(PayLog::Table).col(PayLog::MetapayId).to_owned())
            .await?;
        manager
            .create_index(Index::create().name("idx_settlement_laundry").table(Settlement::Table).col(Settlement::LaundryId).to_owned())
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_laundry_owner").table(Laundry::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_book_user_state").table(Book::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_book_laundry_state").table(Book::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_book_created_at").table(Book::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("uniq_book_line_book_no").table(BookLine::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_pay_account_metapay").table(PayAccount::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_pay_log_metapay").table(PayLog::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_settlement_laundry").table(Settlement::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Laundry { Table, OwnerId }

#[derive(DeriveIden)]
enum Book { Table, UserId, LaundryId, State, CreatedAt }

#[derive(DeriveIden)]
enum BookLine { Table, BookId, LineNo }

#[derive(DeriveIden)]
enum PayAccount { Table, MetapayId }

#[derive(DeriveIden)]
enum PayLog { Table, MetapayId }

#[derive(DeriveIden)]
enum Settlement { Table, LaundryId }
