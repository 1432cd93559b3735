//! Metapay: a prepaid wallet charged from linked bank accounts and debited
//! by bookings paid with the `metapay` method.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::MetapayService;
