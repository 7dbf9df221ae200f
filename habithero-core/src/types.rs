//! Core domain types for habithero
//!
//! These types form the canonical data model behind the scheduling and
//! analytics engine.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | Something a user committed to doing on a cadence |
//! | **Cadence** | How often a habit recurs: daily or weekly |
//! | **Due day** | A calendar day on which a habit's cadence requires action |
//! | **Check-in** | A record that a habit was completed (or explicitly skipped) on a day |
//! | **Streak** | Consecutive completed days ending at a reference day |
//!
//! Cadence and category are closed enums rather than free strings, so an
//! invalid cadence or category is unrepresentable once past ingress parsing.
//! Calendar days are [`NaiveDate`] values interpreted in UTC; time-of-day is
//! not semantically meaningful for a check-in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Cadence
// ============================================

/// How often a habit recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Due every day from the start date onward
    Daily,
    /// Due on the start date's weekday, every week
    Weekly,
}

impl Cadence {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Cadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            _ => Err(format!("cadence must be daily or weekly, got: {}", s)),
        }
    }
}

// ============================================
// Category
// ============================================

/// The fixed set of habit categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Work,
    Learning,
    Lifestyle,
    Fitness,
    MentalWellness,
    Productivity,
}

impl Category {
    /// Returns the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Work => "Work",
            Category::Learning => "Learning",
            Category::Lifestyle => "Lifestyle",
            Category::Fitness => "Fitness",
            Category::MentalWellness => "Mental Wellness",
            Category::Productivity => "Productivity",
        }
    }

    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Work => "work",
            Category::Learning => "learning",
            Category::Lifestyle => "lifestyle",
            Category::Fitness => "fitness",
            Category::MentalWellness => "mental_wellness",
            Category::Productivity => "productivity",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" | "Health" => Ok(Category::Health),
            "work" | "Work" => Ok(Category::Work),
            "learning" | "Learning" => Ok(Category::Learning),
            "lifestyle" | "Lifestyle" => Ok(Category::Lifestyle),
            "fitness" | "Fitness" => Ok(Category::Fitness),
            "mental_wellness" | "Mental Wellness" => Ok(Category::MentalWellness),
            "productivity" | "Productivity" => Ok(Category::Productivity),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

// ============================================
// User
// ============================================

/// An account that owns habits.
///
/// The engine only ever uses the id for scoping; credential material is
/// written and verified by the auth collaborator, never interpreted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Opaque credential material owned by the auth layer
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

// ============================================
// Habit
// ============================================

/// A habit registered by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Habit name
    pub name: String,
    /// Recurrence cadence
    pub cadence: Cadence,
    /// Category
    pub category: Category,
    /// First due day (inclusive); immutable for scheduling purposes
    pub start_date: NaiveDate,
    /// Target duration in days. Informational only: it never gates due-ness
    /// or completion.
    pub target_duration: u32,
    /// Optional free-text note
    pub note: Option<String>,
    /// When the habit was created
    pub created_at: DateTime<Utc>,
    /// When the habit was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub cadence: Cadence,
    pub category: Category,
    pub start_date: NaiveDate,
    pub target_duration: u32,
    #[serde(default)]
    pub note: Option<String>,
}

// ============================================
// Check-ins
// ============================================

/// Recorded outcome of a habit on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinStatus {
    Completed,
    Skipped,
}

impl CheckinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinStatus::Completed => "completed",
            CheckinStatus::Skipped => "skipped",
        }
    }
}

impl std::str::FromStr for CheckinStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(CheckinStatus::Completed),
            "skipped" => Ok(CheckinStatus::Skipped),
            _ => Err(format!("unknown check-in status: {}", s)),
        }
    }
}

/// A check-in for a habit on a specific calendar day.
///
/// At most one check-in exists per `(habit_id, day)` pair; the ledger's
/// uniqueness constraint enforces this. Check-ins are never updated in
/// place and are deleted only when the owning habit is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkin {
    /// Unique identifier
    pub id: i64,
    /// Owning habit
    pub habit_id: i64,
    /// Calendar day of the check-in
    pub day: NaiveDate,
    /// Completed or explicitly skipped
    pub status: CheckinStatus,
    /// Optional free-text notes
    pub notes: Option<String>,
    /// When the record was written
    pub created_at: DateTime<Utc>,
}

// ============================================
// Derived views
// ============================================

/// Check-in state of a due habit for one day.
///
/// `Pending` means no check-in row exists for the day; it is distinct from
/// an explicit `Skipped` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Pending,
    Completed,
    Skipped,
}

impl DueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DueStatus::Pending => "pending",
            DueStatus::Completed => "completed",
            DueStatus::Skipped => "skipped",
        }
    }
}

impl From<Option<CheckinStatus>> for DueStatus {
    fn from(status: Option<CheckinStatus>) -> Self {
        match status {
            None => DueStatus::Pending,
            Some(CheckinStatus::Completed) => DueStatus::Completed,
            Some(CheckinStatus::Skipped) => DueStatus::Skipped,
        }
    }
}

/// A habit due on a given day, annotated with its check-in state and streak.
#[derive(Debug, Clone, Serialize)]
pub struct DueHabit {
    #[serde(flatten)]
    pub habit: Habit,
    /// Check-in state for the reference day
    pub status: DueStatus,
    /// Id of the day's check-in, if one exists
    pub checkin_id: Option<i64>,
    /// Current unbroken completion streak ending at the reference day
    pub current_streak: u32,
}
