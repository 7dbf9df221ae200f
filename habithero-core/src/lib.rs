//! # habithero-core
//!
//! Core library for HabitHero - a personal habit-tracking backend.
//!
//! This library provides the habit scheduling and analytics engine:
//! - Domain types for users, habits, and check-ins
//! - Calendar-day canonicalization (UTC) and due-day resolution
//! - A SQLite-backed check-in ledger enforcing one check-in per habit per day
//! - Streak, success-rate, best-weekday, and time-series analytics
//! - Tiered motivational message selection
//!
//! ## Architecture
//!
//! The engine is stateless between calls: all state lives in the database,
//! and every operation takes an explicit `user_id` supplied by the
//! authenticating collaborator. HTTP routing and credential handling live
//! outside this crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habithero_core::{Config, Database, HabitService};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//! let service = HabitService::new(db);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use service::HabitService;
pub use types::*;

// Public modules
pub mod analytics;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod motivation;
pub mod schedule;
pub mod service;
pub mod types;
