use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// A unique key already holds the value.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::Conflict(msg),
            _ => ModelError::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_db_errors_stay_db_errors() {
        let e = ModelError::from(DbErr::Custom("connection reset".into()));
        assert!(matches!(e, ModelError::Db(ref msg) if msg.contains("connection reset")));
    }
}
