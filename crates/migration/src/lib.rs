//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users;
mod m20240301_000002_create_user_credentials;
mod m20240301_000003_create_laundry;
mod m20240301_000004_create_book;
mod m20240301_000005_create_book_line;
mod m20240301_000006_create_metapay;
mod m20240301_000007_create_pay_account;
mod m20240301_000008_create_pay_log;
mod m20240301_000009_create_settlement;
mod m20240301_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users::Migration),
            Box::new(m20240301_000002_create_user_credentials::Migration),
            Box::new(m20240301_000003_create_laundry::Migration),
            Box::new(m20240301_000004_create_book::Migration),
            Box::new(m20240301_000005_create_book_line::Migration),
            Box::new(m20240301_000006_create_metapay::Migration),
            Box::new(m20240301_000007_create_pay_account::Migration),
            Box::new(m20240301_000008_create_pay_log::Migration),
            Box::new(m20240301_000009_create_settlement::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000010_add_indexes::Migration),
        ]
    }
}
