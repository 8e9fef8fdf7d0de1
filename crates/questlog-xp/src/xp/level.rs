use super::config::XpConfig;
use super::domain::LevelProgress;
use super::rules::round_xp;
use super::XpError;

/// XP needed to complete `level`: `round(levelA * level^levelAlpha)`.
pub fn required_xp(level: u32, config: &XpConfig) -> u64 {
    round_xp(config.level_a * f64::from(level).powf(config.level_alpha))
}

/// Highest level the resolver will walk to.
pub const LEVEL_CEILING: u32 = 1_000_000;

/// Walks the leveling curve from level 1, spending `total` one level at a time.
///
/// Stops at `LEVEL_CEILING`; a total that would carry past it is an error
/// rather than a capped answer, so `into_level_xp < level_need` always holds.
pub fn level_from_total(total: u64, config: &XpConfig) -> Result<LevelProgress, XpError> {
    let mut remaining = total;

    for level in 1..=LEVEL_CEILING {
        let need = required_xp(level, config);
        if remaining < need {
            return Ok(LevelProgress {
                level,
                into_level_xp: remaining,
                level_need: need,
            });
        }
        remaining -= need;
    }

    Err(XpError::LevelOutOfRange {
        total,
        ceiling: LEVEL_CEILING,
    })
}

/// Total XP spent to reach the start of `level`.
pub fn cumulative_xp(level: u32, config: &XpConfig) -> u64 {
    (1..level).fold(0u64, |acc, completed| {
        acc.saturating_add(required_xp(completed, config))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(level_a: f64, level_alpha: f64) -> XpConfig {
        XpConfig {
            level_a,
            level_alpha,
            ..XpConfig::standard()
        }
    }

    #[test]
    fn zero_total_sits_at_level_one() {
        let config = curve(100.0, 1.5);
        assert_eq!(
            level_from_total(0, &config).expect("in range"),
            LevelProgress {
                level: 1,
                into_level_xp: 0,
                level_need: 100,
            }
        );
    }

    #[test]
    fn requirements_strictly_increase() {
        let config = curve(100.0, 1.15);
        let needs: Vec<u64> = (1..=50).map(|level| required_xp(level, &config)).collect();
        assert!(needs.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(needs[0], 100);
        // 100 * 2^1.15 = 221.9
        assert_eq!(needs[1], 222);
    }

    #[test]
    fn exact_boundary_rolls_into_next_level() {
        let config = curve(100.0, 1.5);
        for completed in 1..=12u32 {
            let total = cumulative_xp(completed + 1, &config);
            let progress = level_from_total(total, &config).expect("in range");
            assert_eq!(progress.level, completed + 1);
            assert_eq!(progress.into_level_xp, 0);
            assert_eq!(progress.level_need, required_xp(completed + 1, &config));
        }
    }

    #[test]
    fn one_short_of_boundary_stays_in_level() {
        let config = curve(100.0, 1.5);
        let total = cumulative_xp(4, &config) - 1;
        let progress = level_from_total(total, &config).expect("in range");
        assert_eq!(progress.level, 3);
        assert_eq!(progress.into_level_xp, required_xp(3, &config) - 1);
    }

    #[test]
    fn large_totals_terminate() {
        let config = XpConfig::standard();
        let progress = level_from_total(50_000_000, &config).expect("in range");
        assert!(progress.into_level_xp < progress.level_need);
        assert_eq!(
            cumulative_xp(progress.level, &config) + progress.into_level_xp,
            50_000_000
        );
    }

    #[test]
    fn shallow_curve_stops_at_ceiling() {
        let config = curve(100.0, 0.01);
        match level_from_total(1_000_000_000_000, &config) {
            Err(XpError::LevelOutOfRange { total, ceiling }) => {
                assert_eq!(total, 1_000_000_000_000);
                assert_eq!(ceiling, LEVEL_CEILING);
            }
            other => panic!("expected level range error, got {other:?}"),
        }
    }

    #[test]
    fn shallow_curve_within_ceiling_keeps_invariant() {
        let config = curve(100.0, 0.01);
        let total = 50_000_000;
        let progress = level_from_total(total, &config).expect("in range");
        assert!(progress.into_level_xp < progress.level_need);
        assert_eq!(
            cumulative_xp(progress.level, &config) + progress.into_level_xp,
            total
        );
    }
}
