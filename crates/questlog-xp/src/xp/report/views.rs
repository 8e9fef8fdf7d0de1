use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::super::domain::{DailySummary, EventKind, LedgerEntry};

pub type DailyView = BTreeMap<String, DailySummary>;

/// Flat ledger record: the event fields plus the XP it earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntryView {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub kind_label: &'static str,
    pub sp: f64,
    pub assignees: u32,
    pub pr_closes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    pub xp: u64,
}

impl From<&LedgerEntry> for LedgerEntryView {
    fn from(entry: &LedgerEntry) -> Self {
        let event = &entry.event;
        Self {
            date: event.date(),
            kind: event.kind(),
            kind_label: event.kind().label(),
            sp: event.story_points(),
            assignees: event.assignee_count(),
            pr_closes: event.pr_closes_issue(),
            title: event.title().map(str::to_string),
            number: event.number(),
            xp: entry.xp,
        }
    }
}
