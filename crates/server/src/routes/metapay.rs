use axum::{extract::State, http::StatusCode, Extension, Json};

use service::metapay::domain::{ChargeInput, Metapay, NewPayAccount, PayAccount, PayLog};
use service::Caller;

use super::auth::caller;
use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(post, path = "/metapay", tag = "metapay", responses((status = 201, description = "Wallet opened"), (status = 400, description = "Already opened")))]
pub async fn open(State(state): State<ServerState>, who: Option<Extension<Caller>>) -> Result<(StatusCode, Json<Metapay>), JsonApiError> {
    let wallet = state.metapay.open_metapay(caller(&who)).await?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

#[utoipa::path(get, path = "/metapay", tag = "metapay", responses((status = 200, description = "Wallet with linked accounts"), (status = 404, description = "Not opened")))]
pub async fn get(State(state): State<ServerState>, who: Option<Extension<Caller>>) -> Result<Json<Metapay>, JsonApiError> {
    Ok(Json(state.metapay.get_metapay(caller(&who)).await?))
}

#[utoipa::path(
    post, path = "/metapay/accounts", tag = "metapay",
    request_body = crate::openapi::NewPayAccountDoc,
    responses((status = 201, description = "Linked"), (status = 400, description = "Validation Error"), (status = 404, description = "Wallet not opened"))
)]
pub async fn link_account(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Json(input): Json<NewPayAccount>,
) -> Result<(StatusCode, Json<PayAccount>), JsonApiError> {
    let account = state.metapay.link_pay_account(caller(&who), input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    post, path = "/metapay/charge", tag = "metapay",
    request_body = crate::openapi::ChargeDoc,
    responses((status = 200, description = "Charged"), (status = 400, description = "Validation Error"), (status = 403, description = "Foreign pay account"))
)]
pub async fn charge(
    State(state): State<ServerState>,
    who: Option<Extension<Caller>>,
    Json(input): Json<ChargeInput>,
) -> Result<Json<Metapay>, JsonApiError> {
    Ok(Json(state.metapay.charge(caller(&who), input).await?))
}

#[utoipa::path(get, path = "/metapay/logs", tag = "metapay", responses((status = 200, description = "Pay log, newest first")))]
pub async fn logs(State(state): State<ServerState>, who: Option<Extension<Caller>>) -> Result<Json<Vec<PayLog>>, JsonApiError> {
    Ok(Json(state.metapay.search_pay_logs(caller(&who)).await?))
}
