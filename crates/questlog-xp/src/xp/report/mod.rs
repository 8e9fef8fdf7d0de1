mod series;
pub mod views;

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::domain::{DailySummary, LedgerEntry, XpTotals};
use views::{DailyView, LedgerEntryView};

pub use series::SeriesPoint;

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct XpReport {
    pub ledger: Vec<LedgerEntry>,
    pub daily: BTreeMap<NaiveDate, DailySummary>,
    pub totals: XpTotals,
}

impl XpReport {
    /// Streak recorded on the most recent active day.
    pub fn current_streak(&self) -> u32 {
        self.daily
            .values()
            .next_back()
            .map(|summary| summary.streak)
            .unwrap_or(0)
    }

    pub fn last_active_day(&self) -> Option<NaiveDate> {
        self.daily.keys().next_back().copied()
    }

    /// Day-keyed summary as written to `xp_daily.json`.
    pub fn daily_view(&self) -> DailyView {
        self.daily
            .iter()
            .map(|(day, summary)| (day.format("%Y-%m-%d").to_string(), *summary))
            .collect()
    }

    pub fn ledger_view(&self) -> Vec<LedgerEntryView> {
        self.ledger.iter().map(LedgerEntryView::from).collect()
    }

    /// Trailing `days`-long window ending at `today`, empty days filled with zeros.
    pub fn recent_series(&self, today: NaiveDate, days: u32) -> Vec<SeriesPoint> {
        series::trailing_window(self, today, days)
    }
}
