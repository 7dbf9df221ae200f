//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: users, habits, check-ins
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        name          TEXT NOT NULL,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    DATETIME NOT NULL,
        updated_at    DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS habits (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name            TEXT NOT NULL,
        cadence         TEXT NOT NULL,      -- 'daily', 'weekly'
        category        TEXT NOT NULL,
        start_date      DATE NOT NULL,      -- 'YYYY-MM-DD'
        target_duration INTEGER NOT NULL,   -- in days, informational
        note            TEXT,
        created_at      DATETIME NOT NULL,
        updated_at      DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS checkins (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        habit_id    INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
        checkin_day DATE NOT NULL,          -- 'YYYY-MM-DD'
        status      TEXT NOT NULL,          -- 'completed', 'skipped'
        notes       TEXT,
        created_at  DATETIME NOT NULL,

        -- The ledger's core write-conflict rule: at most one check-in per
        -- habit per day, enforced here so racing inserts serialize in SQLite.
        UNIQUE(habit_id, checkin_day)
    );

    CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
    CREATE INDEX IF NOT EXISTS idx_checkins_habit ON checkins(habit_id);
    CREATE INDEX IF NOT EXISTS idx_checkins_day ON checkins(checkin_day);
    CREATE INDEX IF NOT EXISTS idx_checkins_habit_status ON checkins(habit_id, status);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
