use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::warn;

use service::auth::domain::{LoginInput, RegisterInput};
use service::users::domain::User;
use service::Caller;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Serialize)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
}

/// Borrow the resolved caller, if the request carried a valid token.
pub fn caller(ext: &Option<Extension<Caller>>) -> Option<&Caller> {
    ext.as_ref().map(|Extension(c)| c)
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(LoginOutput { user: session.user, token: session.token })))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

/// Token from `Authorization: Bearer <jwt>`, falling back to the auth cookie.
fn request_token(headers: &HeaderMap) -> Result<Option<String>, JsonApiError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value.to_str().unwrap_or_default();
        return match value.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            _ => {
                warn!("invalid Authorization format (expect Bearer)");
                Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("expected a Bearer token".into())))
            }
        };
    }
    let jar = CookieJar::from_headers(headers);
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Resolves the session for API routes. Requests without a token continue
/// anonymously; a token that fails verification is rejected with 401.
pub async fn resolve_caller(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, JsonApiError> {
    let Some(token) = request_token(req.headers())? else {
        return Ok(next.run(req).await);
    };
    let caller = state.auth.verify_token(&token).map_err(|e| {
        warn!(path = %req.uri().path(), err = %e, "token validation failed");
        JsonApiError::from(e)
    })?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
