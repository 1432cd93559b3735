use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::auth::{AuthConfig, AuthService};
use service::booking::{repository::BookRepository, BookService};
use service::laundry::{repository::LaundryRepository, LaundryService};
use service::metapay::{repository::MetapayRepository, MetapayService};
use service::repo::memory::MemoryStore;
use service::repo::seaorm::SeaOrmRepositories;
use service::users::{repository::UserRepository, UserService};

/// Shared handler state: one instance of every service.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub books: Arc<BookService>,
    pub laundries: Arc<LaundryService>,
    pub metapay: Arc<MetapayService>,
}

impl ServerState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
        laundries: Arc<dyn LaundryRepository>,
        metapays: Arc<dyn MetapayRepository>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users.clone(), auth)),
            users: Arc::new(UserService::new(users.clone())),
            books: Arc::new(BookService::new(books, users, laundries.clone(), metapays.clone())),
            laundries: Arc::new(LaundryService::new(laundries)),
            metapay: Arc::new(MetapayService::new(metapays)),
        }
    }

    /// Postgres-backed state.
    pub fn from_db(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let repos = SeaOrmRepositories::new(db);
        Self::new(repos.users, repos.books, repos.laundries, repos.metapays, auth)
    }

    /// State over a process-local store.
    pub fn in_memory(store: Arc<MemoryStore>, auth: AuthConfig) -> Self {
        Self::new(store.clone(), store.clone(), store.clone(), store, auth)
    }
}
