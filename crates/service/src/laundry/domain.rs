use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laundry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub tel: String,
    pub created_at: DateTime<Utc>,
}

/// Shop registration request; every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewLaundry {
    pub name: Option<String>,
    pub address: Option<String>,
    pub tel: Option<String>,
}

/// Amount owed to a shop for one completed booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: Uuid,
    pub book_id: Uuid,
    pub laundry_id: Uuid,
    pub amount: i64,
    pub settled_at: DateTime<Utc>,
}
