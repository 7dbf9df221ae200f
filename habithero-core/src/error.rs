//! Error types for habithero-core

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the habithero-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing input (bad cadence, unparsable date, empty name, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// Habit does not exist or is not owned by the calling user
    #[error("habit not found: {0}")]
    HabitNotFound(i64),

    /// A check-in already exists for this habit on this day
    #[error("habit {habit_id} already has a check-in on {day}")]
    DuplicateCheckin { habit_id: i64, day: NaiveDate },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for conflicts the caller may retry or treat as a no-op.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::DuplicateCheckin { .. })
    }
}

/// Result type alias for habithero-core
pub type Result<T> = std::result::Result<T, Error>;
