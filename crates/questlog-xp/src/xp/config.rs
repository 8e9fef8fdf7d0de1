use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::Path;

use super::level::required_xp;

/// How the day walker decides whether a streak continues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakMode {
    /// Every active day extends the streak, regardless of calendar gaps.
    #[default]
    ActiveDays,
    /// A calendar day without events resets the streak.
    CalendarDays,
}

/// Tunable XP rules, loaded once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpConfig {
    pub doc_flat_xp: f64,
    #[serde(deserialize_with = "whole_xp")]
    pub micro_cap_per_day: u64,
    pub pr_merge_bonus: f64,
    pub base_xp_per_story_point: f64,
    pub max_streak_multiplier: f64,
    pub level_a: f64,
    pub level_alpha: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub streak_mode: StreakMode,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Accepts `60` and `60.0` alike; fractional or negative caps are rejected.
fn whole_xp<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a whole, non-negative xp amount, got {value}"
        )))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum XpConfigError {
    #[error("failed to read xp config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid xp config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{option} must be a finite number, got {value}")]
    NonFinite { option: &'static str, value: f64 },
    #[error("{option} must not be negative, got {value}")]
    Negative { option: &'static str, value: f64 },
    #[error("{option} must be greater than {minimum}, got {value}")]
    BelowMinimum {
        option: &'static str,
        minimum: f64,
        value: f64,
    },
    #[error("levelA {level_a} rounds the level 1 requirement to zero")]
    DegenerateCurve { level_a: f64 },
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

impl XpConfig {
    /// Defaults used by the dashboard when no config file is present.
    pub fn standard() -> Self {
        Self {
            doc_flat_xp: 10.0,
            micro_cap_per_day: 60,
            pr_merge_bonus: 0.2,
            base_xp_per_story_point: 25.0,
            max_streak_multiplier: 2.5,
            level_a: 100.0,
            level_alpha: 1.15,
            timezone: default_timezone(),
            streak_mode: StreakMode::ActiveDays,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, XpConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, XpConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), XpConfigError> {
        let non_negative = [
            ("docFlatXp", self.doc_flat_xp),
            ("prMergeBonus", self.pr_merge_bonus),
            ("baseXpPerStoryPoint", self.base_xp_per_story_point),
            ("maxStreakMultiplier", self.max_streak_multiplier),
            ("levelA", self.level_a),
            ("levelAlpha", self.level_alpha),
        ];
        for (option, value) in non_negative {
            if !value.is_finite() {
                return Err(XpConfigError::NonFinite { option, value });
            }
            if value < 0.0 {
                return Err(XpConfigError::Negative { option, value });
            }
        }

        if self.max_streak_multiplier < 1.0 {
            return Err(XpConfigError::BelowMinimum {
                option: "maxStreakMultiplier",
                minimum: 1.0,
                value: self.max_streak_multiplier,
            });
        }
        for (option, value) in [("levelA", self.level_a), ("levelAlpha", self.level_alpha)] {
            if value <= 0.0 {
                return Err(XpConfigError::BelowMinimum {
                    option,
                    minimum: 0.0,
                    value,
                });
            }
        }
        if required_xp(1, self) == 0 {
            return Err(XpConfigError::DegenerateCurve {
                level_a: self.level_a,
            });
        }

        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz, XpConfigError> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| XpConfigError::UnknownTimezone(self.timezone.clone()))
    }
}
