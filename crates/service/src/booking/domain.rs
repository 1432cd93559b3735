use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::book::{BookState, PayMethod};
use models::catalog::{clothes_name, fabric_name};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub user_id: Uuid,
    pub laundry_id: Uuid,
    pub book_count: i32,
    pub memo: Option<String>,
    pub method: PayMethod,
    pub total_fee: i64,
    pub state: BookState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<BookLine>,
}

/// One garment in a booking, with catalog names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLine {
    pub line_no: i32,
    pub clothes_id: i16,
    pub clothes_name: String,
    pub fabric_id: i16,
    pub fabric_name: String,
    pub fee: i64,
}

impl BookLine {
    pub fn new(line_no: i32, clothes_id: i16, fabric_id: i16, fee: i64) -> Self {
        Self {
            line_no,
            clothes_id,
            clothes_name: clothes_name(clothes_id).unwrap_or_default().to_string(),
            fabric_id,
            fabric_name: fabric_name(fabric_id).unwrap_or_default().to_string(),
            fee,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBookLine {
    pub clothes_id: i16,
    pub fabric_id: i16,
    pub fee: i64,
}

/// Booking request as received from a client. Missing fields surface as
/// `NotFilledIn`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBook {
    pub user_id: Option<Uuid>,
    pub laundry_id: Option<Uuid>,
    #[serde(default)]
    pub memo: Option<String>,
    pub method: Option<PayMethod>,
    #[serde(default)]
    pub lines: Vec<NewBookLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookStateChange {
    pub book_id: Option<Uuid>,
    pub state: Option<BookState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookQuery {
    pub user_id: Option<Uuid>,
    pub laundry_id: Option<Uuid>,
    pub state: Option<BookState>,
}

/// Validated insert handed to the repository. `debit_from` names the wallet
/// to charge `total_fee` to, inside the same transaction.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub user_id: Uuid,
    pub laundry_id: Uuid,
    pub memo: Option<String>,
    pub method: PayMethod,
    pub total_fee: i64,
    pub lines: Vec<NewBookLine>,
    pub debit_from: Option<Uuid>,
}

/// Wallet credit written together with a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refund {
    pub metapay_id: Uuid,
    pub amount: i64,
}

/// Repository-level list filter. `page` is `(page_index, page_size)`.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub user_id: Option<Uuid>,
    pub laundry_id: Option<Uuid>,
    pub state: Option<BookState>,
    pub created_on: Option<NaiveDate>,
    pub page: Option<(u64, u64)>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        self.user_id.map_or(true, |u| book.user_id == u)
            && self.laundry_id.map_or(true, |l| book.laundry_id == l)
            && self.state.map_or(true, |s| book.state == s)
            && self.created_on.map_or(true, |d| book.created_at.date_naive() == d)
    }
}
