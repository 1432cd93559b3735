//! Postgres-backed repositories built on sea-orm entities from `models`.

mod booking;
mod laundry;
mod metapay;
mod users;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::DatabaseConnection;

pub use booking::SeaOrmBookRepository;
pub use laundry::SeaOrmLaundryRepository;
pub use metapay::SeaOrmMetapayRepository;
pub use users::SeaOrmUserRepository;

pub(crate) fn utc(ts: DateTime<FixedOffset>) -> DateTime<Utc> { ts.with_timezone(&Utc) }

pub(crate) fn now() -> DateTime<FixedOffset> { Utc::now().into() }

/// One repository of each kind sharing a connection pool.
#[derive(Clone)]
pub struct SeaOrmRepositories {
    pub users: std::sync::Arc<SeaOrmUserRepository>,
    pub books: std::sync::Arc<SeaOrmBookRepository>,
    pub laundries: std::sync::Arc<SeaOrmLaundryRepository>,
    pub metapays: std::sync::Arc<SeaOrmMetapayRepository>,
}

impl SeaOrmRepositories {
    pub fn new(db: DatabaseConnection) -> Self {
        use std::sync::Arc;
        Self {
            users: Arc::new(SeaOrmUserRepository { db: db.clone() }),
            books: Arc::new(SeaOrmBookRepository { db: db.clone() }),
            laundries: Arc::new(SeaOrmLaundryRepository { db: db.clone() }),
            metapays: Arc::new(SeaOrmMetapayRepository { db }),
        }
    }
}
