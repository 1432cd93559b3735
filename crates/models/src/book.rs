use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub laundry_id: Uuid,
    pub book_count: i32,
    pub memo: Option<String>,
    pub method: String,
    pub total_fee: i64,
    pub state: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(belongs_to = "super::users::Entity", from = "Column::UserId", to = "super::users::Column::Id")]
    User,
    #[sea_orm(belongs_to = "super::laundry::Entity", from = "Column::LaundryId", to = "super::laundry::Column::Id")]
    Laundry,
    #[sea_orm(has_many = "super::book_line::Entity")]
    Lines,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::laundry::Entity> for Entity {
    fn to() -> RelationDef { Relation::Laundry.def() }
}

impl Related<super::book_line::Entity> for Entity {
    fn to() -> RelationDef { Relation::Lines.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle of a booking.
///
/// `Pending -> InProgress -> Complete`, with `Canceled` reachable from either
/// open state. `Complete` and `Canceled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookState {
    Pending,
    InProgress,
    Complete,
    Canceled,
}

impl BookState {
    pub fn as_str(self) -> &'static str {
        match self {
            BookState::Pending => "pending",
            BookState::InProgress => "in_progress",
            BookState::Complete => "complete",
            BookState::Canceled => "canceled",
        }
    }

    pub fn is_open(self) -> bool { matches!(self, BookState::Pending | BookState::InProgress) }

    pub fn can_transition_to(self, next: BookState) -> bool {
        matches!(
            (self, next),
            (BookState::Pending, BookState::InProgress)
                | (BookState::Pending, BookState::Canceled)
                | (BookState::InProgress, BookState::Complete)
                | (BookState::InProgress, BookState::Canceled)
        )
    }
}

impl fmt::Display for BookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for BookState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookState::Pending),
            "in_progress" => Ok(BookState::InProgress),
            "complete" => Ok(BookState::Complete),
            "canceled" => Ok(BookState::Canceled),
            other => Err(ModelError::Validation(format!("unknown book state: {other}"))),
        }
    }
}

/// How the customer pays for a booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    /// Paid at the counter on pickup.
    OnSite,
    Metapay,
}

impl PayMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PayMethod::OnSite => "on_site",
            PayMethod::Metapay => "metapay",
        }
    }
}

impl fmt::Display for PayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for PayMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_site" => Ok(PayMethod::OnSite),
            "metapay" => Ok(PayMethod::Metapay),
            other => Err(ModelError::Validation(format!("unknown pay method: {other}"))),
        }
    }
}

impl Model {
    pub fn state(&self) -> Result<BookState, ModelError> { self.state.parse() }

    pub fn method(&self) -> Result<PayMethod, ModelError> { self.method.parse() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_states_can_be_canceled() {
        assert!(BookState::Pending.can_transition_to(BookState::Canceled));
        assert!(BookState::InProgress.can_transition_to(BookState::Canceled));
        assert!(!BookState::Complete.can_transition_to(BookState::Canceled));
        assert!(!BookState::Canceled.can_transition_to(BookState::Canceled));
    }

    #[test]
    fn completion_requires_work_in_progress() {
        assert!(!BookState::Pending.can_transition_to(BookState::Complete));
        assert!(BookState::InProgress.can_transition_to(BookState::Complete));
        assert!(!BookState::InProgress.can_transition_to(BookState::Pending));
    }

    #[test]
    fn state_strings_match_storage() {
        assert_eq!(BookState::InProgress.as_str(), "in_progress");
        assert_eq!("canceled".parse::<BookState>().unwrap(), BookState::Canceled);
        assert!("done".parse::<BookState>().is_err());
        assert_eq!("metapay".parse::<PayMethod>().unwrap(), PayMethod::Metapay);
        assert!("card".parse::<PayMethod>().is_err());
    }
}
