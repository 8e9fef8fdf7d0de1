//! Activity stream to XP ledger: day grouping, streak multipliers, award
//! rules, and the leveling curve.

mod config;
pub mod domain;
mod grouping;
mod level;
mod normalize;
mod pipeline;
pub mod report;
mod rules;
mod streak;

pub use config::{StreakMode, XpConfig, XpConfigError};
pub use domain::{
    AwardRule, DailySummary, Event, EventKind, LedgerEntry, LevelProgress, RawEvent, XpTotals,
};
pub use grouping::group_by_day;
pub use level::{cumulative_xp, level_from_total, required_xp, LEVEL_CEILING};
pub use normalize::normalize_events;
pub use pipeline::XpEngine;
pub use report::XpReport;
pub use rules::{award_xp, MicroBudget};
pub use streak::{streak_multiplier, DayStreak, StreakWalker};

#[derive(Debug, thiserror::Error)]
pub enum XpError {
    #[error("event {index}: kind '{kind}' has no award rule")]
    UnclassifiedKind { index: usize, kind: String },
    #[error("event {index}: date '{value}' is not a calendar day or RFC 3339 timestamp")]
    InvalidDate { index: usize, value: String },
    #[error("event {index}: story points must be finite and non-negative, got {value}")]
    InvalidStoryPoints { index: usize, value: f64 },
    #[error("xp earned through {day} does not fit in a 64-bit total")]
    Overflow { day: chrono::NaiveDate },
    #[error("{total} xp is past the level {ceiling} ceiling")]
    LevelOutOfRange { total: u64, ceiling: u32 },
    #[error(transparent)]
    Config(#[from] XpConfigError),
}
