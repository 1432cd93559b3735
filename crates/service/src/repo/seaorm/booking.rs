use std::collections::HashMap;

use chrono::{NaiveTime, TimeZone, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use models::book::BookState;
use models::pay_log::PayLogKind;
use models::{book, book_line, settlement};

use super::metapay::{adjust_balance, insert_log};
use super::{now, utc};
use crate::booking::domain::{Book, BookDraft, BookFilter, BookLine, Refund};
use crate::booking::repository::BookRepository;
use crate::errors::ServiceError;

pub struct SeaOrmBookRepository {
    pub db: DatabaseConnection,
}

fn to_book(m: book::Model, lines: Vec<book_line::Model>) -> Result<Book, ServiceError> {
    Ok(Book {
        method: m.method()?,
        state: m.state()?,
        id: m.id,
        user_id: m.user_id,
        laundry_id: m.laundry_id,
        book_count: m.book_count,
        memo: m.memo,
        total_fee: m.total_fee,
        created_at: utc(m.created_at),
        updated_at: utc(m.updated_at),
        lines: lines.into_iter().map(|l| BookLine::new(l.line_no, l.clothes_id, l.fabric_id, l.fee)).collect(),
    })
}

async fn load_lines<C: ConnectionTrait>(db: &C, ids: Vec<Uuid>) -> Result<HashMap<Uuid, Vec<book_line::Model>>, ServiceError> {
    let mut by_book: HashMap<Uuid, Vec<book_line::Model>> = HashMap::new();
    if ids.is_empty() {
        return Ok(by_book);
    }
    let rows = book_line::Entity::find()
        .filter(book_line::Column::BookId.is_in(ids))
        .order_by_asc(book_line::Column::LineNo)
        .all(db)
        .await?;
    for row in rows {
        by_book.entry(row.book_id).or_default().push(row);
    }
    Ok(by_book)
}

async fn load_book<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Book>, ServiceError> {
    let Some(row) = book::Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    let mut lines = load_lines(db, vec![id]).await?;
    to_book(row, lines.remove(&id).unwrap_or_default()).map(Some)
}

/// Conditional state update: only applies while the row still has `book.state`.
async fn transition<C: ConnectionTrait>(db: &C, book: &Book, to: BookState) -> Result<(), ServiceError> {
    let res = book::Entity::update_many()
        .col_expr(book::Column::State, Expr::value(to.as_str()))
        .col_expr(book::Column::UpdatedAt, Expr::value(now()))
        .filter(book::Column::Id.eq(book.id))
        .filter(book::Column::State.eq(book.state.as_str()))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::InvalidState("booking state changed concurrently".into()));
    }
    Ok(())
}

async fn reload<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Book, ServiceError> {
    load_book(db, id).await?.ok_or_else(|| ServiceError::not_found("book"))
}

#[async_trait::async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn insert_book(&self, draft: BookDraft) -> Result<Book, ServiceError> {
        let txn = self.db.begin().await?;
        let ts = now();
        let book_id = Uuid::new_v4();
        let row = book::ActiveModel {
            id: Set(book_id),
            user_id: Set(draft.user_id),
            laundry_id: Set(draft.laundry_id),
            book_count: Set(draft.lines.len() as i32),
            memo: Set(draft.memo.clone()),
            method: Set(draft.method.as_str().to_string()),
            total_fee: Set(draft.total_fee),
            state: Set(BookState::Pending.as_str().to_string()),
            created_at: Set(ts),
            updated_at: Set(ts),
        }
        .insert(&txn)
        .await?;

        let mut lines = Vec::with_capacity(draft.lines.len());
        for (line_no, line) in (1..).zip(draft.lines.iter()) {
            let inserted = book_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                book_id: Set(book_id),
                line_no: Set(line_no),
                clothes_id: Set(line.clothes_id),
                fabric_id: Set(line.fabric_id),
                fee: Set(line.fee),
            }
            .insert(&txn)
            .await?;
            lines.push(inserted);
        }

        if let Some(metapay_id) = draft.debit_from {
            // dropping `txn` on error rolls back the inserts above
            let balance = adjust_balance(&txn, metapay_id, -draft.total_fee).await?;
            insert_log(&txn, metapay_id, Some(book_id), None, PayLogKind::Payment, -draft.total_fee, balance).await?;
        }

        txn.commit().await?;
        to_book(row, lines)
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<Book>, ServiceError> {
        load_book(&self.db, id).await
    }

    async fn update_state(&self, book: &Book, to: BookState) -> Result<Book, ServiceError> {
        transition(&self.db, book, to).await?;
        reload(&self.db, book.id).await
    }

    async fn complete_book(&self, book: &Book) -> Result<Book, ServiceError> {
        let txn = self.db.begin().await?;
        transition(&txn, book, BookState::Complete).await?;
        settlement::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(book.id),
            laundry_id: Set(book.laundry_id),
            amount: Set(book.total_fee),
            settled_at: Set(now()),
        }
        .insert(&txn)
        .await?;
        let updated = reload(&txn, book.id).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn cancel_book(&self, book: &Book, refund: Option<Refund>) -> Result<Book, ServiceError> {
        let txn = self.db.begin().await?;
        transition(&txn, book, BookState::Canceled).await?;
        if let Some(r) = refund {
            let balance = adjust_balance(&txn, r.metapay_id, r.amount).await?;
            insert_log(&txn, r.metapay_id, Some(book.id), None, PayLogKind::Refund, r.amount, balance).await?;
        }
        let updated = reload(&txn, book.id).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>, ServiceError> {
        let mut q = book::Entity::find();
        if let Some(user_id) = filter.user_id {
            q = q.filter(book::Column::UserId.eq(user_id));
        }
        if let Some(laundry_id) = filter.laundry_id {
            q = q.filter(book::Column::LaundryId.eq(laundry_id));
        }
        if let Some(state) = filter.state {
            q = q.filter(book::Column::State.eq(state.as_str()));
        }
        if let Some(day) = filter.created_on {
            let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
            q = q.filter(book::Column::CreatedAt.gte(start));
            if let Some(next) = day.succ_opt() {
                q = q.filter(book::Column::CreatedAt.lt(Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN))));
            }
        }
        let q = q.order_by_desc(book::Column::CreatedAt).order_by_desc(book::Column::Id);

        let rows = match filter.page {
            Some((idx, per)) => q.paginate(&self.db, per).fetch_page(idx).await?,
            None => q.all(&self.db).await?,
        };
        let mut lines = load_lines(&self.db, rows.iter().map(|r| r.id).collect()).await?;
        rows.into_iter()
            .map(|row| {
                let own = lines.remove(&row.id).unwrap_or_default();
                to_book(row, own)
            })
            .collect()
    }
}
