use async_trait::async_trait;
use uuid::Uuid;

use models::book::BookState;

use super::domain::{Book, BookDraft, BookFilter, Refund};
use crate::errors::ServiceError;

/// Booking persistence. Every method that writes more than one row does so
/// atomically; state changes only apply while the stored state still equals
/// `book.state`, otherwise they fail with `InvalidState`.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Inserts the booking and its lines; with `debit_from` set, also debits
    /// the wallet (failing with `InsufficientBalance`) and logs the payment.
    async fn insert_book(&self, draft: BookDraft) -> Result<Book, ServiceError>;
    async fn find_book(&self, id: Uuid) -> Result<Option<Book>, ServiceError>;
    async fn update_state(&self, book: &Book, to: BookState) -> Result<Book, ServiceError>;
    /// Moves the booking to `complete` and records its settlement.
    async fn complete_book(&self, book: &Book) -> Result<Book, ServiceError>;
    /// Moves the booking to `canceled`, crediting `refund` when given.
    async fn cancel_book(&self, book: &Book, refund: Option<Refund>) -> Result<Book, ServiceError>;
    /// Newest first.
    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>, ServiceError>;
}
