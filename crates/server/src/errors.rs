use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// JSON error response: `{"error": title, "code": n, "detail": text}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub code: Option<u16>,
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: Option<u16>,
    detail: Option<&'a str>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), code: None, detail }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, code = ?self.code, detail = ?self.detail, "request failed");
        } else {
            warn!(status = %self.status, code = ?self.code, error = %self.error, "request rejected");
        }
        let body = ErrorBody { error: &self.error, code: self.code, detail: self.detail.as_deref() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code();
        let (status, title) = match &e {
            ServiceError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "Not Logged In"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            ServiceError::InvalidUser(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            ServiceError::NotFilledIn(_) => (StatusCode::BAD_REQUEST, "Missing Field"),
            ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "Validation Error")
            }
            ServiceError::InsufficientBalance { .. } => (StatusCode::PAYMENT_REQUIRED, "Insufficient Balance"),
            ServiceError::InvalidState(_) => (StatusCode::CONFLICT, "Invalid State"),
            ServiceError::Model(ModelError::Conflict(_)) => (StatusCode::CONFLICT, "Conflict"),
            ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_)) => {
                error!(error = %e, "storage failure");
                return JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None).with_code(code);
            }
        };
        JsonApiError::new(status, title, Some(e.to_string())).with_code(code)
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        let (status, title) = match &e {
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            AuthError::Conflict => (StatusCode::CONFLICT, "Conflict"),
            AuthError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                error!(error = %e, "auth backend failure");
                return JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None).with_code(code);
            }
        };
        JsonApiError::new(status, title, Some(e.to_string())).with_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::NotLoggedIn, StatusCode::UNAUTHORIZED),
            (ServiceError::not_found("book"), StatusCode::NOT_FOUND),
            (ServiceError::InvalidUser("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::not_filled("state"), StatusCode::BAD_REQUEST),
            (ServiceError::InsufficientBalance { balance: 0, required: 1 }, StatusCode::PAYMENT_REQUIRED),
            (ServiceError::InvalidState("x".into()), StatusCode::CONFLICT),
            (ServiceError::Model(ModelError::Validation("x".into())), StatusCode::BAD_REQUEST),
            (ServiceError::Model(ModelError::Conflict("x".into())), StatusCode::CONFLICT),
            (ServiceError::Db("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let e = JsonApiError::from(ServiceError::Db("password=hunter2".into()));
        assert!(e.detail.is_none());
        assert_eq!(e.code, Some(2200));
        assert_eq!(JsonApiError::from(AuthError::Conflict).status, StatusCode::CONFLICT);
    }
}
