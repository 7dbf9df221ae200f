//! Database layer for habithero
//!
//! SQLite storage with:
//! - Schema migrations
//! - Repository pattern for habits and the check-in ledger
//! - The `(habit_id, day)` uniqueness constraint backing `record_completion`

pub mod repo;
pub mod schema;

pub use repo::Database;
