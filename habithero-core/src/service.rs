//! Per-user operation surface
//!
//! [`HabitService`] is the facade the request-handling layer talks to. The
//! caller supplies an authenticated `user_id` explicitly on every call;
//! there is no ambient identity, and every habit mutation is scoped to its
//! owner before the engine touches it. The service is stateless between
//! calls: everything lives in the database.

use chrono::NaiveDate;
use rand::Rng;

use crate::analytics::{
    self, DaySummary, HeatmapEntry, UserAnalytics, HEATMAP_WINDOW_DAYS, SERIES_WINDOW_DAYS,
};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::motivation::{self, Quote};
use crate::schedule::is_due;
use crate::types::{Category, Checkin, CheckinStatus, DueHabit, Habit, NewHabit};

/// Habit scheduling and analytics engine, scoped per-user on every call.
pub struct HabitService {
    db: Database,
}

impl HabitService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Access the underlying repository (for collaborators such as the
    /// auth layer that manage users directly).
    pub fn db(&self) -> &Database {
        &self.db
    }

    // ============================================
    // Habit lifecycle
    // ============================================

    /// Create a habit. Name must be non-empty after trimming and the
    /// target duration positive; cadence and category arrive already
    /// typed, so invalid values cannot reach this point.
    pub fn create_habit(&self, user_id: i64, mut habit: NewHabit) -> Result<Habit> {
        habit.name = habit.name.trim().to_string();
        if habit.name.is_empty() {
            return Err(Error::Validation("habit name must not be empty".to_string()));
        }
        if habit.target_duration == 0 {
            return Err(Error::Validation(
                "target duration must be at least 1 day".to_string(),
            ));
        }
        habit.note = habit
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let created = self.db.insert_habit(user_id, &habit)?;
        tracing::info!(
            user_id,
            habit_id = created.id,
            cadence = %created.cadence,
            "Habit created"
        );
        Ok(created)
    }

    /// List all of a user's habits.
    pub fn list_habits(&self, user_id: i64) -> Result<Vec<Habit>> {
        self.db.list_habits(user_id)
    }

    /// List a user's habits, optionally filtered to one category.
    pub fn list_habits_by_category(
        &self,
        user_id: i64,
        category: Option<Category>,
    ) -> Result<Vec<Habit>> {
        match category {
            Some(category) => self.db.list_habits_by_category(user_id, category),
            None => self.db.list_habits(user_id),
        }
    }

    /// Delete a habit and, via cascade, all of its check-ins.
    pub fn delete_habit(&self, user_id: i64, habit_id: i64) -> Result<()> {
        let habit = self
            .db
            .get_user_habit(user_id, habit_id)?
            .ok_or(Error::HabitNotFound(habit_id))?;

        self.db.delete_habit(habit.id)?;
        tracing::info!(user_id, habit_id, "Habit deleted");
        Ok(())
    }

    // ============================================
    // Daily view
    // ============================================

    /// Habits due on `today`, each annotated with its check-in state and
    /// current streak.
    pub fn list_due_today(&self, user_id: i64, today: NaiveDate) -> Result<Vec<DueHabit>> {
        let habits = self.db.list_habits(user_id)?;

        let mut due = Vec::new();
        for habit in habits.into_iter().filter(|h| is_due(h, today)) {
            let checkin = self.db.get_checkin(habit.id, today)?;
            let current_streak = analytics::current_streak_for(&self.db, habit.id, today)?;

            due.push(DueHabit {
                status: checkin.as_ref().map(|c| c.status).into(),
                checkin_id: checkin.map(|c| c.id),
                current_streak,
                habit,
            });
        }

        Ok(due)
    }

    /// Habits with a completed check-in on `today` (due or not).
    pub fn completed_today(&self, user_id: i64, today: NaiveDate) -> Result<Vec<Habit>> {
        let habits = self.db.list_habits(user_id)?;

        let mut completed = Vec::new();
        for habit in habits {
            let done = self
                .db
                .get_checkin(habit.id, today)?
                .map(|c| c.status == CheckinStatus::Completed)
                .unwrap_or(false);
            if done {
                completed.push(habit);
            }
        }

        Ok(completed)
    }

    /// Habits due on `today` without a completed check-in yet, annotated
    /// with their streaks.
    pub fn missed_today(&self, user_id: i64, today: NaiveDate) -> Result<Vec<DueHabit>> {
        let due = self.list_due_today(user_id, today)?;
        Ok(due
            .into_iter()
            .filter(|d| d.status != crate::types::DueStatus::Completed)
            .collect())
    }

    /// Record a completed check-in for `today`.
    ///
    /// Fails with [`Error::HabitNotFound`] when the habit does not exist or
    /// is not owned by `user_id`, and with [`Error::DuplicateCheckin`] when
    /// the habit was already checked in on `today`.
    pub fn mark_done(
        &self,
        user_id: i64,
        habit_id: i64,
        today: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Checkin> {
        let habit = self
            .db
            .get_user_habit(user_id, habit_id)?
            .ok_or(Error::HabitNotFound(habit_id))?;

        let checkin = self.db.record_completion(habit.id, today, notes)?;
        tracing::info!(user_id, habit_id, day = %today, "Habit marked done");
        Ok(checkin)
    }

    // ============================================
    // Analytics
    // ============================================

    /// Dashboard analytics for the user.
    pub fn analytics(&self, user_id: i64, today: NaiveDate) -> Result<UserAnalytics> {
        analytics::user_analytics(&self.db, user_id, today)
    }

    /// Seven-day daily success series ending at `today`.
    pub fn daily_success_series(&self, user_id: i64, today: NaiveDate) -> Result<Vec<DaySummary>> {
        analytics::daily_success_series(&self.db, user_id, SERIES_WINDOW_DAYS, today)
    }

    /// Thirty-day calendar heatmap ending at `today`.
    pub fn calendar_heatmap(&self, user_id: i64, today: NaiveDate) -> Result<Vec<HeatmapEntry>> {
        analytics::calendar_heatmap(&self.db, user_id, HEATMAP_WINDOW_DAYS, today)
    }

    /// A motivational quote tiered by the user's trailing-week performance.
    pub fn motivational_quote<R: Rng + ?Sized>(
        &self,
        user_id: i64,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<&'static Quote> {
        let habits = self.db.list_habits(user_id)?;
        let rate = analytics::recent_success_rate(&self.db, &habits, today)?;
        Ok(motivation::select_quote(rate, habits.len() as i64, rng))
    }
}
