//! Analytics module for habithero
//!
//! Derived, regenerable statistics over the check-in ledger:
//! - Streak calculation ([`streaks`])
//! - Success rate, best weekday, daily success series, calendar heatmap
//!   ([`engine`])
//!
//! Everything here is a pure read over a snapshot of ledger data; nothing
//! is cached or persisted.

pub mod engine;
pub mod streaks;

pub use engine::{
    best_weekday, calendar_heatmap, current_streak_across, daily_success_series,
    recent_success_rate, success_rate, user_analytics, BestDay, DaySummary, HeatmapEntry,
    UserAnalytics, HEATMAP_WINDOW_DAYS, NO_DATA_LABEL, RECENT_WINDOW_DAYS, SERIES_WINDOW_DAYS,
};
pub use streaks::{current_streak, current_streak_for};
