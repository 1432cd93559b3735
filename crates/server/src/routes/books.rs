use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::book::BookState;
use service::booking::domain::{Book, BookStateChange, NewBook};
use service::pagination::Pagination;
use service::{Caller, ServiceError};

use super::auth::caller;
use super::users::StateQuery;
use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct StateBody {
    pub state: Option<BookState>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page
    pub page: Option<u32>,
    /// Page size, 1..=100
    pub per_page: Option<u32>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let defaults = Pagination::default();
        Pagination { page: q.page.unwrap_or(defaults.page), per_page: q.per_page.unwrap_or(defaults.per_page) }
    }
}

#[utoipa::path(
    post, path = "/books", tag = "books",
    request_body = crate::openapi::NewBookDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Missing Field / Validation Error"),
        (status = 401, description = "Not Logged In"),
        (status = 402, description = "Insufficient Balance"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User, laundry or wallet not found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Json(input): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>), JsonApiError> {
    let book = state.books.make_book(caller(&who), input).await?;
    info!(book_id = %book.id, "book_create_request");
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    get, path = "/books", tag = "books",
    params(PageQuery),
    responses((status = 200, description = "All bookings, newest first"), (status = 403, description = "Admin only"))
)]
pub async fn list(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Book>>, JsonApiError> {
    Ok(Json(state.books.search_book_all(caller(&who), page.into()).await?))
}

#[utoipa::path(
    get, path = "/books/date/{date}", tag = "books",
    params(("date" = String, Path, description = "UTC day, YYYY-MM-DD")),
    responses((status = 200, description = "Bookings created that day"), (status = 400, description = "Malformed date"))
)]
pub async fn by_date(State(state): State<ServerState>, Path(date): Path<String>) -> Result<Json<Vec<Book>>, JsonApiError> {
    Ok(Json(state.books.search_book_by_date(&date).await?))
}

/// A booking in the requested state; 404 when absent, in another state or
/// not visible to the caller.
#[utoipa::path(
    get, path = "/books/{id}", tag = "books",
    params(("id" = Uuid, Path, description = "Book id"), StateQuery),
    responses((status = 200, description = "Booking"), (status = 400, description = "state missing"), (status = 404, description = "Not Found"))
)]
pub async fn get(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Path(id): Path<Uuid>,
    Query(q): Query<StateQuery>,
) -> Result<Json<Book>, JsonApiError> {
    let wanted = q.state.ok_or_else(|| ServiceError::not_filled("state"))?;
    let book = state.books.exist_book_by_book_state(caller(&who), id, wanted).await?;
    book.map(Json).ok_or_else(|| ServiceError::not_found("book").into())
}

#[utoipa::path(
    put, path = "/books/{id}/state", tag = "books",
    params(("id" = Uuid, Path, description = "Book id")),
    request_body = crate::openapi::StateChangeDoc,
    responses((status = 200, description = "Updated"), (status = 403, description = "Not the shop owner"), (status = 409, description = "Invalid State"))
)]
pub async fn update_state(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Path(id): Path<Uuid>,
    Json(body): Json<StateBody>,
) -> Result<Json<Book>, JsonApiError> {
    let change = BookStateChange { book_id: Some(id), state: body.state };
    Ok(Json(state.books.update_book_state(caller(&who), change).await?))
}

#[utoipa::path(
    post, path = "/books/{id}/complete", tag = "books",
    params(("id" = Uuid, Path, description = "Book id")),
    responses((status = 200, description = "Completed and settled"), (status = 403, description = "Not the booker"), (status = 409, description = "Invalid State"))
)]
pub async fn complete(State(state): State<ServerState>, who: Option<Extension<Caller>>, Path(id): Path<Uuid>) -> Result<Json<Book>, JsonApiError> {
    Ok(Json(state.books.update_book_complete(caller(&who), id).await?))
}

#[utoipa::path(
    post, path = "/books/{id}/cancel", tag = "books",
    params(("id" = Uuid, Path, description = "Book id")),
    responses((status = 200, description = "Canceled, Metapay refunded"), (status = 403, description = "Forbidden"), (status = 409, description = "Invalid State"))
)]
pub async fn cancel(State(state): State<ServerState>, who: Option<Extension<Caller>>, Path(id): Path<Uuid>) -> Result<Json<Book>, JsonApiError> {
    Ok(Json(state.books.update_book_canceled(caller(&who), id).await?))
}
