use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::book::{BookState, PayMethod};
use models::catalog::{validate_clothes, validate_fabric};

use super::domain::{Book, BookDraft, BookFilter, BookQuery, BookStateChange, NewBook, NewBookLine, Refund};
use super::repository::BookRepository;
use crate::auth::domain::Caller;
use crate::errors::ServiceError;
use crate::laundry::domain::Laundry;
use crate::laundry::repository::LaundryRepository;
use crate::metapay::repository::MetapayRepository;
use crate::pagination::Pagination;
use crate::users::repository::UserRepository;

pub const MAX_LINES: usize = 100;
pub const MAX_MEMO_CHARS: usize = 500;

/// Checks catalog ids and fees, returning the booking total.
fn total_fee(lines: &[NewBookLine]) -> Result<i64, ServiceError> {
    if lines.len() > MAX_LINES {
        return Err(ServiceError::Validation(format!("at most {MAX_LINES} items per booking")));
    }
    lines.iter().try_fold(0i64, |acc, line| {
        validate_clothes(line.clothes_id)?;
        validate_fabric(line.fabric_id)?;
        if line.fee < 0 {
            return Err(ServiceError::Validation("fee must not be negative".into()));
        }
        acc.checked_add(line.fee).ok_or_else(|| ServiceError::Validation("total fee overflow".into()))
    })
}

fn normalize_memo(memo: Option<String>) -> Result<Option<String>, ServiceError> {
    let memo = memo.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
    if memo.as_ref().is_some_and(|m| m.chars().count() > MAX_MEMO_CHARS) {
        return Err(ServiceError::Validation(format!("memo too long (<={MAX_MEMO_CHARS})")));
    }
    Ok(memo)
}

/// Booking workflows. Each operation checks the session, then the referenced
/// rows, then the caller's rights, and only then writes.
pub struct BookService {
    books: Arc<dyn BookRepository>,
    users: Arc<dyn UserRepository>,
    laundries: Arc<dyn LaundryRepository>,
    metapays: Arc<dyn MetapayRepository>,
}

impl BookService {
    pub fn new(
        books: Arc<dyn BookRepository>,
        users: Arc<dyn UserRepository>,
        laundries: Arc<dyn LaundryRepository>,
        metapays: Arc<dyn MetapayRepository>,
    ) -> Self {
        Self { books, users, laundries, metapays }
    }

    async fn laundry(&self, id: Uuid) -> Result<Laundry, ServiceError> {
        self.laundries.find_laundry(id).await?.ok_or_else(|| ServiceError::not_found("laundry"))
    }

    async fn book(&self, id: Uuid) -> Result<Book, ServiceError> {
        self.books.find_book(id).await?.ok_or_else(|| ServiceError::not_found("book"))
    }

    /// Create a booking. With `PayMethod::Metapay` the booking user's wallet is
    /// debited in the same transaction as the insert.
    #[instrument(skip(self, caller, input), fields(user_id = ?input.user_id, laundry_id = ?input.laundry_id))]
    pub async fn make_book(&self, caller: Option<&Caller>, input: NewBook) -> Result<Book, ServiceError> {
        let user_id = input.user_id.ok_or_else(|| ServiceError::not_filled("user_id"))?;
        let laundry_id = input.laundry_id.ok_or_else(|| ServiceError::not_filled("laundry_id"))?;
        let method = input.method.ok_or_else(|| ServiceError::not_filled("method"))?;
        if input.lines.is_empty() {
            return Err(ServiceError::not_filled("lines"));
        }
        let caller = Caller::require(caller)?;

        self.users.find_user(user_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
        self.laundry(laundry_id).await?;
        if !caller.is_self_or_admin(user_id) {
            return Err(ServiceError::InvalidUser("cannot book on behalf of another user".into()));
        }

        let total = total_fee(&input.lines)?;
        let memo = normalize_memo(input.memo)?;

        let debit_from = match method {
            PayMethod::OnSite => None,
            PayMethod::Metapay => {
                let wallet = self
                    .metapays
                    .find_by_user(user_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("metapay account"))?;
                if wallet.balance < total {
                    debug!(balance = wallet.balance, total, "metapay balance too low");
                    return Err(ServiceError::InsufficientBalance { balance: wallet.balance, required: total });
                }
                Some(wallet.id)
            }
        };

        let book = self
            .books
            .insert_book(BookDraft { user_id, laundry_id, memo, method, total_fee: total, lines: input.lines, debit_from })
            .await?;
        info!(book_id = %book.id, total_fee = book.total_fee, method = %book.method, "book_created");
        Ok(book)
    }

    /// Shop-side state change. Only the shop owner or an admin may move a
    /// booking along the state machine.
    #[instrument(skip(self, caller, change), fields(book_id = ?change.book_id, state = ?change.state))]
    pub async fn update_book_state(&self, caller: Option<&Caller>, change: BookStateChange) -> Result<Book, ServiceError> {
        let book_id = change.book_id.ok_or_else(|| ServiceError::not_filled("book_id"))?;
        let target = change.state.ok_or_else(|| ServiceError::not_filled("state"))?;
        let caller = Caller::require(caller)?;

        let book = self.book(book_id).await?;
        let laundry = self.laundry(book.laundry_id).await?;
        if !caller.is_self_or_admin(laundry.owner_id) {
            return Err(ServiceError::InvalidUser("not the owner of this laundry".into()));
        }
        if !book.state.can_transition_to(target) {
            return Err(ServiceError::InvalidState(format!("cannot move from {} to {}", book.state, target)));
        }

        let updated = match target {
            BookState::Complete => self.books.complete_book(&book).await?,
            BookState::Canceled => self.cancel(&book).await?,
            other => self.books.update_state(&book, other).await?,
        };
        info!(book_id = %updated.id, from = %book.state, to = %updated.state, "book_state_changed");
        Ok(updated)
    }

    /// Booker-side completion: confirms pickup and settles the fee to the shop.
    #[instrument(skip(self, caller))]
    pub async fn update_book_complete(&self, caller: Option<&Caller>, book_id: Uuid) -> Result<Book, ServiceError> {
        let caller = Caller::require(caller)?;
        let book = self.book(book_id).await?;
        if !caller.is_self_or_admin(book.user_id) {
            return Err(ServiceError::InvalidUser("not the booker".into()));
        }
        if book.state != BookState::InProgress {
            return Err(ServiceError::InvalidState(format!("cannot complete a {} booking", book.state)));
        }
        let updated = self.books.complete_book(&book).await?;
        info!(book_id = %updated.id, amount = updated.total_fee, "book_completed");
        Ok(updated)
    }

    #[instrument(skip(self, caller))]
    pub async fn update_book_canceled(&self, caller: Option<&Caller>, book_id: Uuid) -> Result<Book, ServiceError> {
        let caller = Caller::require(caller)?;
        let book = self.book(book_id).await?;
        if !caller.is_self_or_admin(book.user_id) {
            let laundry = self.laundry(book.laundry_id).await?;
            if laundry.owner_id != caller.user_id {
                return Err(ServiceError::InvalidUser("not the booker or the shop owner".into()));
            }
        }
        if !book.state.is_open() {
            return Err(ServiceError::InvalidState(format!("cannot cancel a {} booking", book.state)));
        }
        let updated = self.cancel(&book).await?;
        info!(book_id = %updated.id, refunded = (updated.method == PayMethod::Metapay), "book_canceled");
        Ok(updated)
    }

    async fn cancel(&self, book: &Book) -> Result<Book, ServiceError> {
        let refund = match book.method {
            PayMethod::OnSite => None,
            PayMethod::Metapay => {
                let wallet = self
                    .metapays
                    .find_by_user(book.user_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("metapay account"))?;
                Some(Refund { metapay_id: wallet.id, amount: book.total_fee })
            }
        };
        self.books.cancel_book(book, refund).await
    }

    pub async fn search_book_all(&self, caller: Option<&Caller>, page: Pagination) -> Result<Vec<Book>, ServiceError> {
        let caller = Caller::require(caller)?;
        if !caller.is_admin() {
            return Err(ServiceError::InvalidUser("admin only".into()));
        }
        self.books.list_books(BookFilter { page: Some(page.normalize()), ..Default::default() }).await
    }

    /// Bookings created on a UTC calendar day given as `YYYY-MM-DD`.
    pub async fn search_book_by_date(&self, date: &str) -> Result<Vec<Book>, ServiceError> {
        let date = date.trim();
        if date.is_empty() {
            return Err(ServiceError::not_filled("date"));
        }
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ServiceError::Validation(format!("date must be YYYY-MM-DD, got {date}")))?;
        self.books.list_books(BookFilter { created_on: Some(day), ..Default::default() }).await
    }

    pub async fn search_book_by_user_id(&self, caller: Option<&Caller>, query: BookQuery) -> Result<Vec<Book>, ServiceError> {
        let user_id = query.user_id.ok_or_else(|| ServiceError::not_filled("user_id"))?;
        let caller = Caller::require(caller)?;
        self.users.find_user(user_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
        if !caller.is_self_or_admin(user_id) {
            return Err(ServiceError::InvalidUser("cannot list another user's bookings".into()));
        }
        self.books.list_books(BookFilter { user_id: Some(user_id), state: query.state, ..Default::default() }).await
    }

    pub async fn search_book_by_laundry_id(&self, caller: Option<&Caller>, query: BookQuery) -> Result<Vec<Book>, ServiceError> {
        let laundry_id = query.laundry_id.ok_or_else(|| ServiceError::not_filled("laundry_id"))?;
        let caller = Caller::require(caller)?;
        let laundry = self.laundry(laundry_id).await?;
        if !caller.is_self_or_admin(laundry.owner_id) {
            return Err(ServiceError::InvalidUser("not the owner of this laundry".into()));
        }
        self.books.list_books(BookFilter { laundry_id: Some(laundry_id), state: query.state, ..Default::default() }).await
    }

    /// The booking, if it exists, is in `state` and is visible to the caller.
    pub async fn exist_book_by_book_state(
        &self,
        caller: Option<&Caller>,
        book_id: Uuid,
        state: BookState,
    ) -> Result<Option<Book>, ServiceError> {
        let caller = Caller::require(caller)?;
        let Some(book) = self.books.find_book(book_id).await? else { return Ok(None) };
        if book.state != state {
            return Ok(None);
        }
        if caller.is_self_or_admin(book.user_id) {
            return Ok(Some(book));
        }
        let visible = self
            .laundries
            .find_laundry(book.laundry_id)
            .await?
            .is_some_and(|l| l.owner_id == caller.user_id);
        Ok(visible.then_some(book))
    }
}
