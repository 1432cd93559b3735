//! Repository implementations.
//!
//! `seaorm` is the production backend; `memory` keeps everything in a
//! process-local map and mirrors the same conditional-write semantics.

pub mod memory;
pub mod seaorm;
