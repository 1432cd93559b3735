use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("login required")]
    NotLoggedIn,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not allowed: {0}")]
    InvalidUser(String),
    #[error("required field missing: {0}")]
    NotFilledIn(String),
    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: i64, required: i64 },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn not_filled(field: &str) -> Self { Self::NotFilledIn(field.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::NotLoggedIn => 2001,
            ServiceError::NotFound(_) => 2002,
            ServiceError::InvalidUser(_) => 2003,
            ServiceError::NotFilledIn(_) => 2004,
            ServiceError::InsufficientBalance { .. } => 2005,
            ServiceError::InvalidState(_) => 2006,
            ServiceError::Validation(_) => 2007,
            ServiceError::Model(ModelError::Validation(_)) => 2008,
            ServiceError::Model(ModelError::Conflict(_)) => 2009,
            ServiceError::Model(ModelError::Db(_)) => 2201,
            ServiceError::Db(_) => 2200,
        }
    }

    /// True for failures caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_)))
    }

    /// True when a unique key rejected the write.
    pub fn is_conflict(&self) -> bool { matches!(self, ServiceError::Model(ModelError::Conflict(_))) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        match ModelError::from(e) {
            ModelError::Db(msg) => ServiceError::Db(msg),
            other => ServiceError::Model(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errs = [
            ServiceError::NotLoggedIn,
            ServiceError::not_found("book"),
            ServiceError::InvalidUser("x".into()),
            ServiceError::not_filled("user_id"),
            ServiceError::InsufficientBalance { balance: 1, required: 2 },
            ServiceError::InvalidState("x".into()),
            ServiceError::Validation("x".into()),
            ServiceError::Db("x".into()),
            ServiceError::Model(ModelError::Validation("x".into())),
            ServiceError::Model(ModelError::Conflict("x".into())),
        ];
        let mut codes: Vec<u16> = errs.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn db_failures_are_not_client_errors() {
        assert!(!ServiceError::Db("down".into()).is_client_error());
        assert!(ServiceError::not_found("book").is_client_error());
        assert_eq!(ServiceError::not_found("book").to_string(), "not found: book not found");
        assert!(ServiceError::Model(ModelError::Conflict("login_id".into())).is_client_error());
    }

    #[test]
    fn db_errors_keep_their_message() {
        let e = ServiceError::from(sea_orm::DbErr::Custom("connection reset".into()));
        assert!(matches!(e, ServiceError::Db(ref msg) if msg.contains("connection reset")));
        assert!(!e.is_conflict());
    }
}
