//! Schedule resolver: decides whether a habit is due on a given day.

use chrono::NaiveDate;

use crate::calendar::weekday_index;
use crate::types::{Cadence, Habit};

/// Whether `habit` requires action on `day`.
///
/// Daily habits are due every day from their start date (inclusive).
/// Weekly habits are due on the start date's weekday, from the start date
/// onward. A habit with a future start date is never due. There is no
/// upper bound: `target_duration` does not gate due-ness.
pub fn is_due(habit: &Habit, day: NaiveDate) -> bool {
    if day < habit.start_date {
        return false;
    }

    match habit.cadence {
        Cadence::Daily => true,
        Cadence::Weekly => weekday_index(day) == weekday_index(habit.start_date),
    }
}
