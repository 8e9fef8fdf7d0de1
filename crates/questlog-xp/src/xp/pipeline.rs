use std::collections::BTreeMap;
use tracing::{debug, info};

use super::config::XpConfig;
use super::domain::{DailySummary, Event, LedgerEntry, RawEvent, XpTotals};
use super::grouping::group_by_day;
use super::level::level_from_total;
use super::normalize::normalize_events;
use super::report::XpReport;
use super::rules::{award_xp, MicroBudget};
use super::streak::StreakWalker;
use super::XpError;

/// Turns an activity stream into a ledger, daily summaries, and level
/// progress. Holds only the validated rules; every run starts fresh.
#[derive(Debug, Clone)]
pub struct XpEngine {
    config: XpConfig,
}

impl XpEngine {
    pub fn new(config: XpConfig) -> Result<Self, XpError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &XpConfig {
        &self.config
    }

    /// Validates the whole input before computing anything.
    pub fn run(&self, raw: &[RawEvent]) -> Result<XpReport, XpError> {
        let events = normalize_events(raw, &self.config)?;
        self.compute(&events)
    }

    /// Fails without a partial report when any award or sum leaves the
    /// `u64` range, or the total carries past the level ceiling.
    pub fn compute(&self, events: &[Event]) -> Result<XpReport, XpError> {
        let mut walker =
            StreakWalker::new(self.config.streak_mode, self.config.max_streak_multiplier);
        let mut daily = BTreeMap::new();
        let mut ledger = Vec::with_capacity(events.len());
        let mut total_xp: u64 = 0;

        for (day, day_events) in group_by_day(events) {
            let streak = walker.visit(day, day_events.len());
            let mut budget = MicroBudget::new();
            let mut day_xp: u64 = 0;

            for event in &day_events {
                let xp = award_xp(event, streak.multiplier, &mut budget, &self.config)
                    .ok_or(XpError::Overflow { day })?;
                day_xp = day_xp.checked_add(xp).ok_or(XpError::Overflow { day })?;
                ledger.push(LedgerEntry {
                    event: (*event).clone(),
                    xp,
                });
            }

            debug!(
                %day,
                streak = streak.streak,
                multiplier = streak.multiplier,
                events = day_events.len(),
                xp = day_xp,
                micro_xp = budget.awarded(),
                "walked activity day"
            );

            total_xp = total_xp
                .checked_add(day_xp)
                .ok_or(XpError::Overflow { day })?;
            daily.insert(
                day,
                DailySummary {
                    xp: day_xp,
                    streak: streak.streak,
                    events: day_events.len(),
                },
            );
        }

        let level = level_from_total(total_xp, &self.config)?;
        info!(
            events = events.len(),
            days = daily.len(),
            total_xp,
            level = level.level,
            "xp ledger computed"
        );

        Ok(XpReport {
            ledger,
            daily,
            totals: XpTotals { total_xp, level },
        })
    }
}
