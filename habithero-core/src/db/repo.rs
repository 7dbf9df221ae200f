//! Database repository layer
//!
//! Query and insert operations for users, habits, and the check-in ledger.
//! The ledger's one-check-in-per-habit-per-day rule lives here: it is a
//! UNIQUE constraint in the schema, so `record_completion` is a single
//! atomic insert rather than a check-then-insert in application code.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // User operations
    // ============================================

    /// Create a user. The password hash is opaque credential material
    /// produced by the auth collaborator.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        let result = conn.execute(
            r#"
            INSERT INTO users (name, email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![name, email, password_hash, now.to_rfc3339(), now.to_rfc3339()],
        );

        match result {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: now,
                updated_at: now,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(Error::Validation(format!(
                    "email already registered: {}",
                    email
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM users WHERE id = ?", [id], Self::row_to_user)
            .optional()
            .map_err(Error::from)
    }

    /// Get a user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM users WHERE email = ?",
            [email],
            Self::row_to_user,
        )
        .optional()
        .map_err(Error::from)
    }

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;

        Ok(User {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            created_at: parse_ts(&created_at_str),
            updated_at: parse_ts(&updated_at_str),
        })
    }

    // ============================================
    // Habit operations
    // ============================================

    /// Insert a habit for a user
    pub fn insert_habit(&self, user_id: i64, habit: &NewHabit) -> Result<Habit> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        conn.execute(
            r#"
            INSERT INTO habits (user_id, name, cadence, category, start_date,
                                target_duration, note, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user_id,
                habit.name,
                habit.cadence.as_str(),
                habit.category.as_str(),
                habit.start_date.to_string(),
                habit.target_duration,
                habit.note,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Habit {
            id: conn.last_insert_rowid(),
            user_id,
            name: habit.name.clone(),
            cadence: habit.cadence,
            category: habit.category,
            start_date: habit.start_date,
            target_duration: habit.target_duration,
            note: habit.note.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a habit by id
    pub fn get_habit(&self, habit_id: i64) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM habits WHERE id = ?",
            [habit_id],
            Self::row_to_habit,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Get a habit scoped to its owner. Returns None when the habit does
    /// not exist or belongs to a different user; callers cannot tell the
    /// two apart.
    pub fn get_user_habit(&self, user_id: i64, habit_id: i64) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM habits WHERE id = ?1 AND user_id = ?2",
            params![habit_id, user_id],
            Self::row_to_habit,
        )
        .optional()
        .map_err(Error::from)
    }

    /// List a user's habits, oldest first
    pub fn list_habits(&self, user_id: i64) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM habits WHERE user_id = ? ORDER BY created_at ASC, id ASC")?;

        let habits = stmt
            .query_map([user_id], Self::row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    /// List a user's habits filtered by category
    pub fn list_habits_by_category(
        &self,
        user_id: i64,
        category: Category,
    ) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM habits WHERE user_id = ?1 AND category = ?2 ORDER BY created_at ASC, id ASC",
        )?;

        let habits = stmt
            .query_map(params![user_id, category.as_str()], Self::row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    /// Delete a habit. Its check-ins go with it via the FK cascade.
    /// Returns true if a row was deleted.
    pub fn delete_habit(&self, habit_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM habits WHERE id = ?", [habit_id])?;
        Ok(deleted > 0)
    }

    fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
        let cadence_str: String = row.get("cadence")?;
        let category_str: String = row.get("category")?;
        let start_date_str: String = row.get("start_date")?;
        let created_at_str: String = row.get("created_at")?;
        let updated_at_str: String = row.get("updated_at")?;

        Ok(Habit {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            cadence: cadence_str.parse().unwrap_or(Cadence::Daily),
            category: category_str.parse().unwrap_or(Category::Lifestyle),
            start_date: parse_date(&start_date_str),
            target_duration: row.get("target_duration")?,
            note: row.get("note")?,
            created_at: parse_ts(&created_at_str),
            updated_at: parse_ts(&updated_at_str),
        })
    }

    // ============================================
    // Check-in ledger
    // ============================================

    /// Record a completed check-in for a habit on a day.
    ///
    /// The `(habit_id, checkin_day)` UNIQUE constraint makes this a single
    /// atomic insert: of two racing calls for the same pair, exactly one
    /// succeeds and the other gets [`Error::DuplicateCheckin`] with no
    /// mutation.
    pub fn record_completion(
        &self,
        habit_id: i64,
        day: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Checkin> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();

        let result = conn.execute(
            r#"
            INSERT INTO checkins (habit_id, checkin_day, status, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                habit_id,
                day.to_string(),
                CheckinStatus::Completed.as_str(),
                notes,
                created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => Ok(Checkin {
                id: conn.last_insert_rowid(),
                habit_id,
                day,
                status: CheckinStatus::Completed,
                notes: notes.map(str::to_string),
                created_at,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(Error::DuplicateCheckin { habit_id, day })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the check-in for a habit on a specific day, if any
    pub fn get_checkin(&self, habit_id: i64, day: NaiveDate) -> Result<Option<Checkin>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM checkins WHERE habit_id = ?1 AND checkin_day = ?2",
            params![habit_id, day.to_string()],
            Self::row_to_checkin,
        )
        .optional()
        .map_err(Error::from)
    }

    /// List completed check-ins for a set of habits within an inclusive
    /// day range, ordered by day ascending.
    pub fn list_completions(
        &self,
        habit_ids: &[i64],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Checkin>> {
        if habit_ids.is_empty() {
            return Ok(vec![]);
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT * FROM checkins
             WHERE habit_id IN ({})
               AND status = 'completed'
               AND checkin_day >= ?1 AND checkin_day <= ?2
             ORDER BY checkin_day ASC, habit_id ASC",
            id_list(habit_ids)
        );

        let mut stmt = conn.prepare(&sql)?;
        let checkins = stmt
            .query_map(
                params![from.to_string(), to.to_string()],
                Self::row_to_checkin,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(checkins)
    }

    /// Completed check-in days for one habit, newest first. Input to the
    /// streak walk.
    pub fn completed_days(&self, habit_id: i64) -> Result<Vec<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT checkin_day FROM checkins
             WHERE habit_id = ? AND status = 'completed'
             ORDER BY checkin_day DESC",
        )?;

        let days = stmt
            .query_map([habit_id], |row| {
                let day_str: String = row.get(0)?;
                Ok(parse_date(&day_str))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(days)
    }

    /// Completed check-in days across a set of habits (all time, unordered
    /// duplicates allowed - one entry per check-in).
    pub fn completed_days_for(&self, habit_ids: &[i64]) -> Result<Vec<NaiveDate>> {
        if habit_ids.is_empty() {
            return Ok(vec![]);
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT checkin_day FROM checkins
             WHERE habit_id IN ({}) AND status = 'completed'",
            id_list(habit_ids)
        );

        let mut stmt = conn.prepare(&sql)?;
        let days = stmt
            .query_map([], |row| {
                let day_str: String = row.get(0)?;
                Ok(parse_date(&day_str))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(days)
    }

    /// Count all check-ins (any status) across a set of habits
    pub fn count_checkins(&self, habit_ids: &[i64]) -> Result<i64> {
        if habit_ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT COUNT(*) FROM checkins WHERE habit_id IN ({})",
            id_list(habit_ids)
        );
        let count: i64 = conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(count)
    }

    /// Count completed check-ins across a set of habits
    pub fn count_completed(&self, habit_ids: &[i64]) -> Result<i64> {
        if habit_ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT COUNT(*) FROM checkins WHERE habit_id IN ({}) AND status = 'completed'",
            id_list(habit_ids)
        );
        let count: i64 = conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(count)
    }

    /// Count completed check-ins within an inclusive day range
    pub fn count_completed_between(
        &self,
        habit_ids: &[i64],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64> {
        if habit_ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT COUNT(*) FROM checkins
             WHERE habit_id IN ({})
               AND status = 'completed'
               AND checkin_day >= ?1 AND checkin_day <= ?2",
            id_list(habit_ids)
        );
        let count: i64 =
            conn.query_row(&sql, params![from.to_string(), to.to_string()], |r| r.get(0))?;
        Ok(count)
    }

    /// Count completed check-ins on a single day
    pub fn count_completed_on(&self, habit_ids: &[i64], day: NaiveDate) -> Result<i64> {
        self.count_completed_between(habit_ids, day, day)
    }

    /// Completed check-ins for a user joined with their habit names, within
    /// an inclusive day range. Feeds the calendar heatmap.
    pub fn completed_with_habit_names(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT c.checkin_day, h.name
            FROM checkins c
            JOIN habits h ON h.id = c.habit_id
            WHERE h.user_id = ?1
              AND c.status = 'completed'
              AND c.checkin_day >= ?2 AND c.checkin_day <= ?3
            ORDER BY c.checkin_day ASC, h.name ASC
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                |row| {
                    let day_str: String = row.get(0)?;
                    let name: String = row.get(1)?;
                    Ok((parse_date(&day_str), name))
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn row_to_checkin(row: &Row) -> rusqlite::Result<Checkin> {
        let day_str: String = row.get("checkin_day")?;
        let status_str: String = row.get("status")?;
        let created_at_str: String = row.get("created_at")?;

        Ok(Checkin {
            id: row.get("id")?,
            habit_id: row.get("habit_id")?,
            day: parse_date(&day_str),
            status: status_str.parse().unwrap_or(CheckinStatus::Completed),
            notes: row.get("notes")?,
            created_at: parse_ts(&created_at_str),
        })
    }
}

/// Render an id slice as a SQL IN-list. Safe to splice: values are i64.
fn id_list(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn seed_habit(db: &Database) -> Habit {
        let user = db.create_user("Ada", "ada@example.com", "hash").unwrap();
        db.insert_habit(
            user.id,
            &NewHabit {
                name: "Read".to_string(),
                cadence: Cadence::Daily,
                category: Category::Learning,
                start_date: d(2024, 1, 1),
                target_duration: 30,
                note: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = test_db();
        db.create_user("Ada", "ada@example.com", "hash").unwrap();
        let err = db.create_user("Eve", "ada@example.com", "hash").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_habit_round_trip() {
        let db = test_db();
        let habit = seed_habit(&db);

        let loaded = db.get_habit(habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Read");
        assert_eq!(loaded.cadence, Cadence::Daily);
        assert_eq!(loaded.category, Category::Learning);
        assert_eq!(loaded.start_date, d(2024, 1, 1));
        assert_eq!(loaded.target_duration, 30);

        // Ownership scoping: a different user sees nothing
        assert!(db.get_user_habit(habit.user_id, habit.id).unwrap().is_some());
        assert!(db.get_user_habit(999, habit.id).unwrap().is_none());
    }

    #[test]
    fn test_record_completion_once() {
        let db = test_db();
        let habit = seed_habit(&db);

        let checkin = db
            .record_completion(habit.id, d(2024, 1, 1), Some("felt good"))
            .unwrap();
        assert_eq!(checkin.status, CheckinStatus::Completed);
        assert_eq!(checkin.day, d(2024, 1, 1));

        // Second call for the same (habit, day) fails and changes nothing
        let err = db
            .record_completion(habit.id, d(2024, 1, 1), None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateCheckin { habit_id, day } if habit_id == habit.id && day == d(2024, 1, 1)
        ));
        assert!(err.is_conflict());
        assert_eq!(db.count_checkins(&[habit.id]).unwrap(), 1);

        // A different day is fine
        db.record_completion(habit.id, d(2024, 1, 2), None).unwrap();
        assert_eq!(db.count_checkins(&[habit.id]).unwrap(), 2);
    }

    #[test]
    fn test_get_checkin_absent_means_pending() {
        let db = test_db();
        let habit = seed_habit(&db);

        assert!(db.get_checkin(habit.id, d(2024, 1, 1)).unwrap().is_none());
        db.record_completion(habit.id, d(2024, 1, 1), None).unwrap();
        let found = db.get_checkin(habit.id, d(2024, 1, 1)).unwrap().unwrap();
        assert_eq!(found.habit_id, habit.id);
    }

    #[test]
    fn test_completed_days_descending() {
        let db = test_db();
        let habit = seed_habit(&db);

        for day in [d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 2)] {
            db.record_completion(habit.id, day, None).unwrap();
        }

        let days = db.completed_days(habit.id).unwrap();
        assert_eq!(days, vec![d(2024, 1, 3), d(2024, 1, 2), d(2024, 1, 1)]);
    }

    #[test]
    fn test_list_completions_window() {
        let db = test_db();
        let habit = seed_habit(&db);

        for day in 1..=10 {
            db.record_completion(habit.id, d(2024, 1, day), None).unwrap();
        }

        let window = db
            .list_completions(&[habit.id], d(2024, 1, 3), d(2024, 1, 5))
            .unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].day, d(2024, 1, 3));
        assert_eq!(window[2].day, d(2024, 1, 5));

        // Empty id set short-circuits
        assert!(db
            .list_completions(&[], d(2024, 1, 1), d(2024, 1, 31))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_habit_cascades_checkins() {
        let db = test_db();
        let habit = seed_habit(&db);
        db.record_completion(habit.id, d(2024, 1, 1), None).unwrap();
        db.record_completion(habit.id, d(2024, 1, 2), None).unwrap();

        assert!(db.delete_habit(habit.id).unwrap());
        assert!(db.get_habit(habit.id).unwrap().is_none());

        // No orphan check-ins may exist
        let orphans: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM checkins", [], |r| r.get(0))
            .unwrap();
        assert_eq!(orphans, 0);

        // Deleting again reports nothing deleted
        assert!(!db.delete_habit(habit.id).unwrap());
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.db");
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        seed_habit(&db);
        assert!(path.exists());
    }
}
