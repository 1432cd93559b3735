//! Bookings: creation with optional Metapay payment, the state machine,
//! completion settlements, cancellation refunds and the search operations.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::BookService;
