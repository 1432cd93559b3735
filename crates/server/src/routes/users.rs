use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::book::BookState;
use models::users::UserType;
use service::booking::domain::{Book, BookQuery};
use service::users::domain::{ProfileUpdate, User};
use service::Caller;

use super::auth::caller;
use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    #[param(value_type = Option<String>, example = "owner")]
    pub user_type: Option<UserType>,
}

/// Optional `?state=` filter shared by the booking list endpoints.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StateQuery {
    #[param(value_type = Option<String>, example = "pending")]
    pub state: Option<BookState>,
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    params(UserListQuery),
    responses((status = 200, description = "Users"), (status = 401, description = "Not Logged In"), (status = 403, description = "Admin only"))
)]
pub async fn list(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Query(q): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, JsonApiError> {
    Ok(Json(state.users.search_users(caller(&who), q.user_type).await?))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "User"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, who: Option<Extension<Caller>>, Path(id): Path<Uuid>) -> Result<Json<User>, JsonApiError> {
    Ok(Json(state.users.get_user(caller(&who), id).await?))
}

#[utoipa::path(
    put, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = crate::openapi::ProfileUpdateDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden"))
)]
pub async fn update(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProfileUpdate>,
) -> Result<Json<User>, JsonApiError> {
    Ok(Json(state.users.update_profile(caller(&who), id, input).await?))
}

#[utoipa::path(
    get, path = "/users/{id}/books", tag = "books",
    params(("id" = Uuid, Path, description = "Booking user id"), StateQuery),
    responses((status = 200, description = "Bookings, newest first"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found"))
)]
pub async fn books(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Path(id): Path<Uuid>,
    Query(q): Query<StateQuery>,
) -> Result<Json<Vec<Book>>, JsonApiError> {
    let query = BookQuery { user_id: Some(id), laundry_id: None, state: q.state };
    Ok(Json(state.books.search_book_by_user_id(caller(&who), query).await?))
}
