//! Analytics aggregator
//!
//! Aggregate statistics over the check-in ledger: all-time success rate,
//! best weekday, daily success series, and the cross-habit streak. Success
//! rate and best-day always cover the full history; only the daily series
//! and the heatmap are windowed.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::streaks::current_streak_for;
use crate::calendar::{weekday_index, weekday_label_short, WEEKDAY_LABELS};
use crate::db::Database;
use crate::error::Result;
use crate::schedule::is_due;
use crate::types::Habit;

/// Days covered by the daily success series
pub const SERIES_WINDOW_DAYS: u32 = 7;

/// Days covered by the calendar heatmap
pub const HEATMAP_WINDOW_DAYS: u32 = 30;

/// Trailing window for the recent success rate feeding quote tiering
pub const RECENT_WINDOW_DAYS: u32 = 7;

/// Sentinel label when no completed check-ins exist
pub const NO_DATA_LABEL: &str = "No data yet";

/// Weekday with the most completed check-ins, or the no-data sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestDay {
    Weekday(&'static str),
    NoData,
}

impl BestDay {
    pub fn label(&self) -> &'static str {
        match self {
            BestDay::Weekday(label) => label,
            BestDay::NoData => NO_DATA_LABEL,
        }
    }
}

/// Dashboard analytics for one user.
#[derive(Debug, Clone, Serialize)]
pub struct UserAnalytics {
    /// All-time completed / total check-ins, one decimal place
    pub success_rate: f64,
    /// Number of registered habits
    pub total_habits: i64,
    /// All-time completed check-in count
    pub completed_checkins: i64,
    /// Best current streak across all habits
    pub current_streak: u32,
    /// Weekday label with the most completions, or "No data yet"
    pub best_day: String,
}

impl UserAnalytics {
    fn empty() -> Self {
        Self {
            success_rate: 0.0,
            total_habits: 0,
            completed_checkins: 0,
            current_streak: 0,
            best_day: NO_DATA_LABEL.to_string(),
        }
    }
}

/// One day of the daily success series.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    /// Calendar day
    pub day: NaiveDate,
    /// Abbreviated weekday label ("Mon")
    pub weekday: &'static str,
    /// completed / total_possible, one decimal place; 0 when nothing was due
    pub success_rate: f64,
    /// Completed check-ins among due habits on this day
    pub completed: i64,
    /// Habits due on this day
    pub total_possible: i64,
}

/// One completed check-in in the calendar heatmap window.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapEntry {
    pub day: NaiveDate,
    pub habit_name: String,
    pub count: i64,
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// All-time success rate over a set of habits: completed / total * 100,
/// one decimal place, 0 when there are no check-ins at all.
pub fn success_rate(db: &Database, habit_ids: &[i64]) -> Result<f64> {
    let total = db.count_checkins(habit_ids)?;
    if total == 0 {
        return Ok(0.0);
    }
    let completed = db.count_completed(habit_ids)?;
    Ok(round1(completed as f64 / total as f64 * 100.0))
}

/// Weekday with the most completed check-ins across all time.
///
/// Ties break to the lowest weekday index (Monday first), so the result is
/// deterministic.
pub fn best_weekday(db: &Database, habit_ids: &[i64]) -> Result<BestDay> {
    let days = db.completed_days_for(habit_ids)?;
    if days.is_empty() {
        return Ok(BestDay::NoData);
    }

    let mut tallies = [0i64; 7];
    for day in days {
        tallies[weekday_index(day) as usize] += 1;
    }

    let mut best = 0;
    for (i, &tally) in tallies.iter().enumerate() {
        if tally > tallies[best] {
            best = i;
        }
    }

    Ok(BestDay::Weekday(WEEKDAY_LABELS[best]))
}

/// Best current streak across a set of habits; 0 for the empty set.
pub fn current_streak_across(
    db: &Database,
    habit_ids: &[i64],
    reference_day: NaiveDate,
) -> Result<u32> {
    let mut best = 0;
    for &habit_id in habit_ids {
        best = best.max(current_streak_for(db, habit_id, reference_day)?);
    }
    Ok(best)
}

/// Per-day success over the inclusive window `[end - window + 1, end]`.
///
/// `total_possible` counts the user's habits due that day; `completed`
/// counts completed check-ins that day among those due habits.
pub fn daily_success_series(
    db: &Database,
    user_id: i64,
    window_days: u32,
    end_day: NaiveDate,
) -> Result<Vec<DaySummary>> {
    let habits = db.list_habits(user_id)?;
    let start_day = end_day - Duration::days(i64::from(window_days) - 1);

    let mut series = Vec::with_capacity(window_days as usize);
    let mut day = start_day;
    while day <= end_day {
        let due_ids: Vec<i64> = habits
            .iter()
            .filter(|habit| is_due(habit, day))
            .map(|habit| habit.id)
            .collect();

        let total_possible = due_ids.len() as i64;
        let completed = if total_possible > 0 {
            db.count_completed_on(&due_ids, day)?
        } else {
            0
        };

        let rate = if total_possible > 0 {
            round1(completed as f64 / total_possible as f64 * 100.0)
        } else {
            0.0
        };

        series.push(DaySummary {
            day,
            weekday: weekday_label_short(day),
            success_rate: rate,
            completed,
            total_possible,
        });

        day += Duration::days(1);
    }

    Ok(series)
}

/// Dashboard analytics for a user on a reference day.
///
/// A user with no habits gets the zeroed result with the no-data sentinel.
pub fn user_analytics(db: &Database, user_id: i64, today: NaiveDate) -> Result<UserAnalytics> {
    let habits = db.list_habits(user_id)?;
    if habits.is_empty() {
        return Ok(UserAnalytics::empty());
    }

    let habit_ids: Vec<i64> = habits.iter().map(|h| h.id).collect();

    Ok(UserAnalytics {
        success_rate: success_rate(db, &habit_ids)?,
        total_habits: habits.len() as i64,
        completed_checkins: db.count_completed(&habit_ids)?,
        current_streak: current_streak_across(db, &habit_ids, today)?,
        best_day: best_weekday(db, &habit_ids)?.label().to_string(),
    })
}

/// Completed check-ins in the inclusive window `[end - window + 1, end]`,
/// one entry per check-in with a fixed count of 1. Same windowing as the
/// daily success series.
pub fn calendar_heatmap(
    db: &Database,
    user_id: i64,
    window_days: u32,
    end_day: NaiveDate,
) -> Result<Vec<HeatmapEntry>> {
    let from = end_day - Duration::days(i64::from(window_days) - 1);
    let rows = db.completed_with_habit_names(user_id, from, end_day)?;

    Ok(rows
        .into_iter()
        .map(|(day, habit_name)| HeatmapEntry {
            day,
            habit_name,
            count: 1,
        })
        .collect())
}

/// Recent success rate feeding the motivational selector: completed
/// check-ins in the trailing 7 days (inclusive of today) over
/// `total_habits * 7`, as a percentage; 0 when the user has no habits.
pub fn recent_success_rate(db: &Database, habits: &[Habit], today: NaiveDate) -> Result<f64> {
    if habits.is_empty() {
        return Ok(0.0);
    }

    let habit_ids: Vec<i64> = habits.iter().map(|h| h.id).collect();
    let from = today - Duration::days(i64::from(RECENT_WINDOW_DAYS) - 1);
    let completed = db.count_completed_between(&habit_ids, from, today)?;
    let total_possible = habits.len() as i64 * i64::from(RECENT_WINDOW_DAYS);

    Ok(completed as f64 / total_possible as f64 * 100.0)
}
