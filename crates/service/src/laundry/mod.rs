//! Laundry shops and their settlement records.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::LaundryService;
