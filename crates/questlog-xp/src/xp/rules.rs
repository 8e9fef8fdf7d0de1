use super::config::XpConfig;
use super::domain::{AwardRule, Event, EventKind};

/// Rounds half to even, saturating at zero for negative input.
pub(crate) fn round_xp(value: f64) -> u64 {
    let rounded = value.round_ties_even();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        rounded as u64
    }
}

/// 2^64, the first value `u64` cannot hold.
const XP_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Like `round_xp`, but `None` once the rounded value leaves the `u64` range.
fn checked_round_xp(value: f64) -> Option<u64> {
    let rounded = value.round_ties_even();
    if rounded >= XP_LIMIT {
        None
    } else {
        Some(round_xp(rounded))
    }
}

/// Capped-kind XP already granted on the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MicroBudget {
    awarded: u64,
}

impl MicroBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awarded(&self) -> u64 {
        self.awarded
    }

    pub fn remaining(&self, cap: u64) -> u64 {
        cap.saturating_sub(self.awarded)
    }

    fn grant(&mut self, base: u64, cap: u64) -> u64 {
        let award = base.min(self.remaining(cap));
        self.awarded += award;
        award
    }
}

/// XP earned by one event under the day's multiplier.
///
/// Capped kinds draw from `budget`, which the caller resets each day.
/// `None` means the story-point award does not fit in a `u64`.
pub fn award_xp(
    event: &Event,
    multiplier: f64,
    budget: &mut MicroBudget,
    config: &XpConfig,
) -> Option<u64> {
    match event.kind().award_rule() {
        AwardRule::Capped => {
            let base = round_xp(config.doc_flat_xp * multiplier);
            Some(budget.grant(base, config.micro_cap_per_day))
        }
        AwardRule::StoryPointRate => story_point_xp(event, multiplier, config),
    }
}

fn story_point_xp(event: &Event, multiplier: f64, config: &XpConfig) -> Option<u64> {
    let bonus = if event.kind() == EventKind::PrMerged && event.pr_closes_issue() {
        config.pr_merge_bonus
    } else {
        0.0
    };
    let per_story_point = config.base_xp_per_story_point * (1.0 + bonus);
    let share = event.story_points() / f64::from(event.assignee_count().max(1));

    checked_round_xp(share * per_story_point * multiplier)
}
