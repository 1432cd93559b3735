//! Pieces shared by the binaries and the HTTP layer.

pub mod types;
pub mod utils;
