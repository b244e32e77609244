//! Repository modules implementing CRUD operations for users and identities.
//!
//! Each module adds methods to `LodeService` via `impl LodeService` blocks.
//! Reads that must also run inside a transaction are free functions taking a
//! `&libsql::Connection`; a `libsql::Transaction` derefs to one.

pub mod global;
pub mod org;
pub mod social;
pub mod users;
