//! Integration tests for the habit scheduling and analytics engine
//!
//! These drive the full stack - service facade, check-in ledger, schedule
//! resolver, and analytics - over an in-memory SQLite database.

use chrono::NaiveDate;
use habithero_core::analytics;
use habithero_core::calendar;
use habithero_core::motivation::{catalog, Tier};
use habithero_core::{
    Cadence, Category, Database, DueStatus, Error, HabitService, NewHabit,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> (HabitService, i64) {
    let db = Database::open_in_memory().expect("open in-memory db");
    db.migrate().expect("migrate");
    let user = db
        .create_user("Ada Lovelace", "ada@example.com", "argon2-hash")
        .expect("create user");
    (HabitService::new(db), user.id)
}

fn habit(name: &str, cadence: Cadence, start: NaiveDate) -> NewHabit {
    NewHabit {
        name: name.to_string(),
        cadence,
        category: Category::Fitness,
        start_date: start,
        target_duration: 30,
        note: None,
    }
}

// ============================================
// Scheduling
// ============================================

#[test]
fn test_weekly_habit_due_days() {
    let (svc, user_id) = setup();
    // Monday 2024-01-01
    svc.create_habit(user_id, habit("Review", Cadence::Weekly, d(2024, 1, 1)))
        .unwrap();

    for (day, expected) in [
        (d(2024, 1, 1), true),
        (d(2024, 1, 8), true),
        (d(2024, 1, 15), true),
        (d(2024, 1, 2), false),
        (d(2023, 12, 25), false), // Monday, but before the start date
    ] {
        let due = svc.list_due_today(user_id, day).unwrap();
        assert_eq!(due.len(), usize::from(expected), "due-ness on {}", day);
    }
}

#[test]
fn test_future_start_date_not_due() {
    let (svc, user_id) = setup();
    svc.create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 6, 1)))
        .unwrap();

    assert!(svc.list_due_today(user_id, d(2024, 5, 31)).unwrap().is_empty());
    assert_eq!(svc.list_due_today(user_id, d(2024, 6, 1)).unwrap().len(), 1);
}

// ============================================
// Ledger
// ============================================

#[test]
fn test_mark_done_then_duplicate_conflict() {
    let (svc, user_id) = setup();
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();

    let checkin = svc
        .mark_done(user_id, h.id, d(2024, 1, 5), Some("5k"))
        .unwrap();
    assert_eq!(checkin.day, d(2024, 1, 5));
    assert_eq!(checkin.notes.as_deref(), Some("5k"));

    let err = svc.mark_done(user_id, h.id, d(2024, 1, 5), None).unwrap_err();
    assert!(matches!(err, Error::DuplicateCheckin { .. }));
    assert!(err.is_conflict());

    // Ledger unchanged by the failing call
    let due = svc.list_due_today(user_id, d(2024, 1, 5)).unwrap();
    assert_eq!(due[0].status, DueStatus::Completed);
    assert_eq!(due[0].checkin_id, Some(checkin.id));
}

#[test]
fn test_delete_habit_removes_checkins() {
    let (svc, user_id) = setup();
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();
    svc.mark_done(user_id, h.id, d(2024, 1, 1), None).unwrap();
    svc.mark_done(user_id, h.id, d(2024, 1, 2), None).unwrap();

    svc.delete_habit(user_id, h.id).unwrap();

    let analytics = svc.analytics(user_id, d(2024, 1, 2)).unwrap();
    assert_eq!(analytics.total_habits, 0);
    assert_eq!(analytics.completed_checkins, 0);

    assert!(matches!(
        svc.delete_habit(user_id, h.id).unwrap_err(),
        Error::HabitNotFound(_)
    ));
}

// ============================================
// Streaks and analytics
// ============================================

#[test]
fn test_streak_three_consecutive_days() {
    let (svc, user_id) = setup();
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();

    // D-2, D-1, D completed; nothing on D-3
    for day in [d(2024, 1, 8), d(2024, 1, 9), d(2024, 1, 10)] {
        svc.mark_done(user_id, h.id, day, None).unwrap();
    }

    let due = svc.list_due_today(user_id, d(2024, 1, 10)).unwrap();
    assert_eq!(due[0].current_streak, 3);

    // The day after, with no check-in yet, the streak resets to 0
    let due = svc.list_due_today(user_id, d(2024, 1, 11)).unwrap();
    assert_eq!(due[0].current_streak, 0);
}

#[test]
fn test_analytics_full_picture() {
    let (svc, user_id) = setup();
    let run = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();
    let review = svc
        .create_habit(user_id, habit("Review", Cadence::Weekly, d(2024, 1, 1)))
        .unwrap();

    // Mondays 1st/8th/15th for the weekly habit, a Tue/Wed pair for the daily
    for day in [d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 15)] {
        svc.mark_done(user_id, review.id, day, None).unwrap();
    }
    for day in [d(2024, 1, 9), d(2024, 1, 10)] {
        svc.mark_done(user_id, run.id, day, None).unwrap();
    }

    let stats = svc.analytics(user_id, d(2024, 1, 15)).unwrap();
    assert_eq!(stats.total_habits, 2);
    assert_eq!(stats.completed_checkins, 5);
    // All 5 check-ins completed
    assert_eq!(stats.success_rate, 100.0);
    // 3 Mondays vs 1 Tuesday + 1 Wednesday
    assert_eq!(stats.best_day, "Monday");
    // Review completed on the reference day; run last completed on the 10th
    assert_eq!(stats.current_streak, 1);
}

#[test]
fn test_analytics_zero_habits_sentinel() {
    let (svc, user_id) = setup();
    let stats = svc.analytics(user_id, d(2024, 1, 15)).unwrap();
    assert_eq!(stats.success_rate, 0.0);
    assert_eq!(stats.total_habits, 0);
    assert_eq!(stats.best_day, "No data yet");
}

#[test]
fn test_daily_success_series_window() {
    let (svc, user_id) = setup();
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();
    svc.mark_done(user_id, h.id, d(2024, 1, 14), None).unwrap();

    let series = svc.daily_success_series(user_id, d(2024, 1, 14)).unwrap();
    assert_eq!(series.len(), 7);
    assert_eq!(series[0].day, d(2024, 1, 8));
    assert_eq!(series[6].day, d(2024, 1, 14));
    assert_eq!(series[6].completed, 1);
    assert_eq!(series[6].total_possible, 1);
    assert_eq!(series[6].success_rate, 100.0);
    assert_eq!(series[5].completed, 0);
    assert_eq!(series[5].success_rate, 0.0);
}

#[test]
fn test_calendar_heatmap_window() {
    let (svc, user_id) = setup();
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2023, 1, 1)))
        .unwrap();

    svc.mark_done(user_id, h.id, d(2024, 1, 10), None).unwrap();
    svc.mark_done(user_id, h.id, d(2024, 1, 12), None).unwrap();
    // The 30-day window ending 2024-01-15 starts 2023-12-17: the first day
    // is included, the day before is not.
    svc.mark_done(user_id, h.id, d(2023, 12, 17), None).unwrap();
    svc.mark_done(user_id, h.id, d(2023, 12, 16), None).unwrap();

    let heatmap = svc.calendar_heatmap(user_id, d(2024, 1, 15)).unwrap();
    assert_eq!(heatmap.len(), 3);
    assert_eq!(heatmap[0].day, d(2023, 12, 17));
    assert_eq!(heatmap[1].day, d(2024, 1, 10));
    assert_eq!(heatmap[0].habit_name, "Run");
    assert_eq!(heatmap[0].count, 1);
}

// ============================================
// Motivation
// ============================================

#[test]
fn test_quote_tiers_follow_recent_performance() {
    let (svc, user_id) = setup();
    let mut rng = StdRng::seed_from_u64(42);

    // No habits yet: new-user tier
    let quote = svc
        .motivational_quote(user_id, d(2024, 1, 14), &mut rng)
        .unwrap();
    assert!(catalog(Tier::NewUser).contains(quote));

    // One habit completed every day of the trailing week: high tier
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();
    for day in 8..=14u32 {
        svc.mark_done(user_id, h.id, d(2024, 1, day), None).unwrap();
    }
    let quote = svc
        .motivational_quote(user_id, d(2024, 1, 14), &mut rng)
        .unwrap();
    assert!(catalog(Tier::HighPerformance).contains(quote));

    // Months later with nothing recent: low tier
    let quote = svc
        .motivational_quote(user_id, d(2024, 6, 14), &mut rng)
        .unwrap();
    assert!(catalog(Tier::LowPerformance).contains(quote));
}

// ============================================
// Ingress canonicalization
// ============================================

#[test]
fn test_dates_canonicalized_on_ingress() {
    let day = calendar::parse_day("2024-01-08T15:30:00Z").unwrap();
    assert_eq!(day, d(2024, 1, 8));

    let (svc, user_id) = setup();
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();
    svc.mark_done(user_id, h.id, day, None).unwrap();

    // A different time of day on the same calendar day is the same day
    let same_day = calendar::parse_day("2024-01-08T03:00:00Z").unwrap();
    assert!(matches!(
        svc.mark_done(user_id, h.id, same_day, None).unwrap_err(),
        Error::DuplicateCheckin { .. }
    ));
}

#[test]
fn test_multi_user_isolation() {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    let ada = db.create_user("Ada", "ada@example.com", "h").unwrap();
    let eve = db.create_user("Eve", "eve@example.com", "h").unwrap();
    let svc = HabitService::new(db);

    let ada_habit = svc
        .create_habit(ada.id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();
    svc.create_habit(eve.id, habit("Read", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();

    assert_eq!(svc.list_habits(ada.id).unwrap().len(), 1);
    assert_eq!(svc.list_habits(eve.id).unwrap().len(), 1);

    // Eve cannot touch Ada's habit
    assert!(matches!(
        svc.mark_done(eve.id, ada_habit.id, d(2024, 1, 5), None)
            .unwrap_err(),
        Error::HabitNotFound(_)
    ));
    assert!(matches!(
        svc.delete_habit(eve.id, ada_habit.id).unwrap_err(),
        Error::HabitNotFound(_)
    ));

    // Eve's analytics are not polluted by Ada's data
    svc.mark_done(ada.id, ada_habit.id, d(2024, 1, 5), None).unwrap();
    let eve_stats = svc.analytics(eve.id, d(2024, 1, 5)).unwrap();
    assert_eq!(eve_stats.completed_checkins, 0);
}

#[test]
fn test_streak_pure_function_matches_ledger() {
    // The pure walk and the repo-backed wrapper agree
    let (svc, user_id) = setup();
    let h = svc
        .create_habit(user_id, habit("Run", Cadence::Daily, d(2024, 1, 1)))
        .unwrap();
    for day in [d(2024, 1, 3), d(2024, 1, 4), d(2024, 1, 5)] {
        svc.mark_done(user_id, h.id, day, None).unwrap();
    }

    let from_ledger =
        analytics::current_streak_for(svc.db(), h.id, d(2024, 1, 5)).unwrap();
    let pure = analytics::current_streak(
        &[d(2024, 1, 5), d(2024, 1, 4), d(2024, 1, 3)],
        d(2024, 1, 5),
    );
    assert_eq!(from_ledger, 3);
    assert_eq!(from_ledger, pure);
}
