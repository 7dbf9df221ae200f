//! Motivational message selection
//!
//! Recent performance maps to a message tier; the message within a tier is
//! picked uniformly at random. Tier selection is a pure function so tests
//! can pin it; the pick itself goes through an injected [`rand::Rng`] and
//! carries no further contract (repeats are fine).

use rand::Rng;
use serde::Serialize;

/// Performance tier, evaluated in order: first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// No habits registered yet
    NewUser,
    /// Recent success rate >= 80%
    HighPerformance,
    /// Recent success rate >= 50%
    MediumPerformance,
    /// Everything else
    LowPerformance,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::NewUser => "new_user",
            Tier::HighPerformance => "high_performance",
            Tier::MediumPerformance => "medium_performance",
            Tier::LowPerformance => "low_performance",
        }
    }

    /// Map recent performance to a tier.
    ///
    /// `recent_success_rate` is the trailing-7-day completion percentage
    /// computed by the caller (see `analytics::recent_success_rate`).
    pub fn for_performance(recent_success_rate: f64, total_habits: i64) -> Self {
        if total_habits == 0 {
            Tier::NewUser
        } else if recent_success_rate >= 80.0 {
            Tier::HighPerformance
        } else if recent_success_rate >= 50.0 {
            Tier::MediumPerformance
        } else {
            Tier::LowPerformance
        }
    }
}

/// A motivational quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
    pub category: &'static str,
}

const HIGH_PERFORMANCE: &[Quote] = &[
    Quote {
        text: "Your consistency is inspiring! Keep building those powerful habits that shape your destiny.",
        author: "HabitHero AI",
        category: "High Performance",
    },
    Quote {
        text: "Excellence is not a single act, but a habit. You are what you repeatedly do!",
        author: "Aristotle",
        category: "Consistency",
    },
];

const MEDIUM_PERFORMANCE: &[Quote] = &[
    Quote {
        text: "Progress, not perfection. Every small step counts on your journey to greatness.",
        author: "HabitHero AI",
        category: "Progress",
    },
    Quote {
        text: "The journey of a thousand miles begins with a single step. You're on your way!",
        author: "Lao Tzu",
        category: "Journey",
    },
];

const LOW_PERFORMANCE: &[Quote] = &[
    Quote {
        text: "Every master was once a beginner. Your commitment to starting is what truly matters.",
        author: "HabitHero AI",
        category: "Encouragement",
    },
    Quote {
        text: "Don't let yesterday take up too much of today. Every day is a new beginning!",
        author: "Will Rogers",
        category: "Fresh Start",
    },
];

const NEW_USER: &[Quote] = &[
    Quote {
        text: "The first step towards getting somewhere is to decide you're not going to stay where you are.",
        author: "John Pierpont Morgan",
        category: "Beginning",
    },
    Quote {
        text: "Your future self will thank you for the habits you start building today.",
        author: "HabitHero AI",
        category: "Future Self",
    },
];

/// The fixed message catalog for a tier. Never empty.
pub fn catalog(tier: Tier) -> &'static [Quote] {
    match tier {
        Tier::NewUser => NEW_USER,
        Tier::HighPerformance => HIGH_PERFORMANCE,
        Tier::MediumPerformance => MEDIUM_PERFORMANCE,
        Tier::LowPerformance => LOW_PERFORMANCE,
    }
}

/// Pick a quote for the given recent performance: tier first, then a
/// uniform choice within the tier's catalog.
pub fn select_quote<R: Rng + ?Sized>(
    recent_success_rate: f64,
    total_habits: i64,
    rng: &mut R,
) -> &'static Quote {
    let tier = Tier::for_performance(recent_success_rate, total_habits);
    let quotes = catalog(tier);
    &quotes[rng.gen_range(0..quotes.len())]
}
