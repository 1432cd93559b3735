use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use service::booking::domain::{Book, BookQuery};
use service::laundry::domain::{Laundry, NewLaundry, Settlement};
use service::Caller;

use super::auth::caller;
use super::users::StateQuery;
use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/laundries", tag = "laundries",
    request_body = crate::openapi::NewLaundryDoc,
    responses((status = 201, description = "Registered"), (status = 400, description = "Missing Field / Validation Error"), (status = 403, description = "Owners only"))
)]
pub async fn create(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Json(input): Json<NewLaundry>,
) -> Result<(StatusCode, Json<Laundry>), JsonApiError> {
    let laundry = state.laundries.register_laundry(caller(&who), input).await?;
    Ok((StatusCode::CREATED, Json(laundry)))
}

#[utoipa::path(get, path = "/laundries/mine", tag = "laundries", responses((status = 200, description = "Shops owned by the caller")))]
pub async fn mine(State(state): State<ServerState>, who: Option<Extension<Caller>>) -> Result<Json<Vec<Laundry>>, JsonApiError> {
    Ok(Json(state.laundries.list_my_laundries(caller(&who)).await?))
}

#[utoipa::path(
    get, path = "/laundries/{id}", tag = "laundries",
    params(("id" = Uuid, Path, description = "Laundry id")),
    responses((status = 200, description = "Laundry"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Laundry>, JsonApiError> {
    Ok(Json(state.laundries.get_laundry(id).await?))
}

#[utoipa::path(
    get, path = "/laundries/{id}/books", tag = "books",
    params(("id" = Uuid, Path, description = "Laundry id"), StateQuery),
    responses((status = 200, description = "Bookings, newest first"), (status = 403, description = "Not the owner"), (status = 404, description = "Not Found"))
)]
pub async fn books(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Path(id): Path<Uuid>,
    Query(q): Query<StateQuery>,
) -> Result<Json<Vec<Book>>, JsonApiError> {
    let query = BookQuery { user_id: None, laundry_id: Some(id), state: q.state };
    Ok(Json(state.books.search_book_by_laundry_id(caller(&who), query).await?))
}

#[utoipa::path(
    get, path = "/laundries/{id}/settlements", tag = "laundries",
    params(("id" = Uuid, Path, description = "Laundry id")),
    responses((status = 200, description = "Settlements, newest first"), (status = 403, description = "Not the owner"))
)]
pub async fn settlements(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Settlement>>, JsonApiError> {
    Ok(Json(state.laundries.search_settlements(caller(&who), id).await?))
}
