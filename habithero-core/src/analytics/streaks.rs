//! Streak calculation
//!
//! A streak is the number of consecutive days, ending at a reference day,
//! with a completed check-in and no gap. The walk operates purely on
//! completion records: due-ness filtering is the aggregator's concern, so
//! a weekly habit completed seven days running scores a streak of seven.

use chrono::NaiveDate;

use crate::db::Database;
use crate::error::Result;

/// Walk completed check-in days backward from `reference_day`.
///
/// `completed_days` must be sorted descending and hold at most one entry
/// per day (the ledger's uniqueness constraint guarantees both when the
/// input comes from [`Database::completed_days`]).
///
/// Returns the largest `k` such that completed check-ins exist on
/// `reference_day, reference_day - 1, ..., reference_day - k + 1`. If no
/// check-in exists on `reference_day` itself the streak is 0: a day that
/// has not been completed yet breaks the streak.
pub fn current_streak(completed_days: &[NaiveDate], reference_day: NaiveDate) -> u32 {
    let mut streak: u32 = 0;

    for &day in completed_days {
        if (reference_day - day).num_days() == i64::from(streak) {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

/// Streak for one habit, reading its completed days from the ledger.
pub fn current_streak_for(db: &Database, habit_id: i64, reference_day: NaiveDate) -> Result<u32> {
    let days = db.completed_days(habit_id)?;
    Ok(current_streak(&days, reference_day))
}
