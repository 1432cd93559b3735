//! Persistence models: sea-orm entities, stored value enums and the fixed
//! catalog tables shared by the service and HTTP layers.

pub mod errors;
pub mod db;
pub mod catalog;
pub mod users;
pub mod user_credentials;
pub mod laundry;
pub mod book;
pub mod book_line;
pub mod metapay;
pub mod pay_account;
pub mod pay_log;
pub mod settlement;

#[cfg(test)]
mod tests;
