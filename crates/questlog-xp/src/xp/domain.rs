use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Activity kinds recognized by the XP rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Docs,
    Quest,
    PrMerged,
    IssueClosed,
}

impl EventKind {
    pub const fn ordered() -> [Self; 4] {
        [Self::IssueClosed, Self::PrMerged, Self::Docs, Self::Quest]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::Quest => "quest",
            Self::PrMerged => "pr_merged",
            Self::IssueClosed => "issue_closed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Docs => "Documentation",
            Self::Quest => "Quest",
            Self::PrMerged => "Pull Request Merged",
            Self::IssueClosed => "Issue Closed",
        }
    }

    /// Every kind is classified into exactly one award rule.
    pub const fn award_rule(self) -> AwardRule {
        match self {
            Self::Docs | Self::Quest => AwardRule::Capped,
            Self::PrMerged | Self::IssueClosed => AwardRule::StoryPointRate,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EventKind::ordered()
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
            .ok_or_else(|| UnknownEventKind(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardRule {
    /// Flat XP per event, sharing a daily ceiling.
    Capped,
    /// XP scales with story points, split across assignees.
    StoryPointRate,
}

/// Event record as it arrives from the activity export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub date: String,
    pub kind: String,
    #[serde(default)]
    pub sp: f64,
    #[serde(default = "default_assignees")]
    pub assignees: i64,
    #[serde(default)]
    pub pr_closes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

fn default_assignees() -> i64 {
    1
}

impl RawEvent {
    pub fn new(date: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
            sp: 0.0,
            assignees: default_assignees(),
            pr_closes: false,
            title: None,
            number: None,
        }
    }

    pub fn with_story_points(mut self, sp: f64) -> Self {
        self.sp = sp;
        self
    }

    pub fn with_assignees(mut self, assignees: i64) -> Self {
        self.assignees = assignees;
        self
    }

    pub fn closing_issue(mut self) -> Self {
        self.pr_closes = true;
        self
    }
}

/// Validated activity attributed to a single calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    date: NaiveDate,
    kind: EventKind,
    story_points: f64,
    assignee_count: u32,
    pr_closes_issue: bool,
    title: Option<String>,
    number: Option<u64>,
}

impl Event {
    pub(crate) fn new(
        date: NaiveDate,
        kind: EventKind,
        story_points: f64,
        assignee_count: u32,
        pr_closes_issue: bool,
    ) -> Self {
        Self {
            date,
            kind,
            story_points,
            assignee_count: assignee_count.max(1),
            pr_closes_issue,
            title: None,
            number: None,
        }
    }

    pub(crate) fn with_reference(mut self, title: Option<String>, number: Option<u64>) -> Self {
        self.title = title;
        self.number = number;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn story_points(&self) -> f64 {
        self.story_points
    }

    pub fn assignee_count(&self) -> u32 {
        self.assignee_count
    }

    pub fn pr_closes_issue(&self) -> bool {
        self.pr_closes_issue
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn number(&self) -> Option<u64> {
        self.number
    }
}

/// An event paired with the XP it earned.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub event: Event,
    pub xp: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub xp: u64,
    pub streak: u32,
    pub events: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    #[serde(rename = "intoLevelXP")]
    pub into_level_xp: u64,
    #[serde(rename = "levelNeed")]
    pub level_need: u64,
}

impl LevelProgress {
    pub fn xp_to_next(&self) -> u64 {
        self.level_need.saturating_sub(self.into_level_xp)
    }

    /// Percentage of the current level completed, clamped to 0..=100.
    pub fn progress_pct(&self) -> u8 {
        if self.level_need == 0 {
            return 0;
        }
        let pct = (self.into_level_xp as f64 / self.level_need as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpTotals {
    #[serde(rename = "totalXp")]
    pub total_xp: u64,
    #[serde(flatten)]
    pub level: LevelProgress,
}
