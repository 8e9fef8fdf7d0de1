use chrono::NaiveDate;

use super::config::StreakMode;

/// `min(max, 1 + 0.2 * streak^0.6)`; exactly 1.0 at streak 0.
pub fn streak_multiplier(streak: u32, max_multiplier: f64) -> f64 {
    let raw = 1.0 + 0.2 * f64::from(streak).powf(0.6);
    raw.min(max_multiplier)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayStreak {
    pub day: NaiveDate,
    pub streak: u32,
    pub multiplier: f64,
}

/// Tracks the running streak as active days are visited in ascending order.
#[derive(Debug, Clone)]
pub struct StreakWalker {
    mode: StreakMode,
    max_multiplier: f64,
    streak: u32,
    last_day: Option<NaiveDate>,
}

impl StreakWalker {
    pub fn new(mode: StreakMode, max_multiplier: f64) -> Self {
        Self {
            mode,
            max_multiplier,
            streak: 0,
            last_day: None,
        }
    }

    /// Advances to `day`, which must be later than every day visited before.
    pub fn visit(&mut self, day: NaiveDate, event_count: usize) -> DayStreak {
        debug_assert!(self.last_day.map_or(true, |last| last < day));

        if self.mode == StreakMode::CalendarDays && self.broke_on(day) {
            self.streak = 0;
        }

        if event_count > 0 {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 0;
        }
        self.last_day = Some(day);

        DayStreak {
            day,
            streak: self.streak,
            multiplier: streak_multiplier(self.streak, self.max_multiplier),
        }
    }

    pub fn current(&self) -> u32 {
        self.streak
    }

    fn broke_on(&self, day: NaiveDate) -> bool {
        match self.last_day.and_then(|last| last.succ_opt()) {
            Some(next) => next != day,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).expect("valid date")
    }

    #[test]
    fn multiplier_starts_at_one_and_clamps() {
        assert_eq!(streak_multiplier(0, 2.5), 1.0);
        assert!((streak_multiplier(1, 2.5) - 1.2).abs() < 1e-12);
        assert_eq!(streak_multiplier(10_000, 2.5), 2.5);
    }

    #[test]
    fn multiplier_is_non_decreasing_and_bounded() {
        let max = 1.9;
        let values: Vec<f64> = (0..500).map(|s| streak_multiplier(s, max)).collect();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(values.iter().all(|value| *value <= max));
    }

    #[test]
    fn active_days_mode_ignores_calendar_gaps() {
        let mut walker = StreakWalker::new(StreakMode::ActiveDays, 2.5);
        assert_eq!(walker.visit(day(1), 2).streak, 1);
        assert_eq!(walker.visit(day(2), 1).streak, 2);
        assert_eq!(walker.visit(day(20), 1).streak, 3);
        assert_eq!(walker.current(), 3);
    }

    #[test]
    fn calendar_days_mode_resets_after_gap() {
        let mut walker = StreakWalker::new(StreakMode::CalendarDays, 2.5);
        assert_eq!(walker.visit(day(1), 1).streak, 1);
        assert_eq!(walker.visit(day(2), 1).streak, 2);
        let after_gap = walker.visit(day(4), 3);
        assert_eq!(after_gap.streak, 1);
        assert!((after_gap.multiplier - 1.2).abs() < 1e-12);
    }

    #[test]
    fn empty_day_resets_streak() {
        let mut walker = StreakWalker::new(StreakMode::ActiveDays, 2.5);
        walker.visit(day(1), 1);
        let quiet = walker.visit(day(2), 0);
        assert_eq!(quiet.streak, 0);
        assert_eq!(quiet.multiplier, 1.0);
    }
}
