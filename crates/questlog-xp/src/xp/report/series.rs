use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::super::domain::EventKind;
use super::XpReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub day: NaiveDate,
    pub weekday: String,
    pub xp: u64,
    pub events: usize,
    pub issues: usize,
}

pub(super) fn trailing_window(report: &XpReport, today: NaiveDate, days: u32) -> Vec<SeriesPoint> {
    if days == 0 {
        return Vec::new();
    }
    let Some(start) = today.checked_sub_signed(Duration::days(i64::from(days) - 1)) else {
        return Vec::new();
    };

    let mut points: Vec<SeriesPoint> = start
        .iter_days()
        .take(days as usize)
        .map(|day| {
            let summary = report.daily.get(&day).copied().unwrap_or_default();
            SeriesPoint {
                day,
                weekday: day.format("%a").to_string(),
                xp: summary.xp,
                events: summary.events,
                issues: 0,
            }
        })
        .collect();

    for entry in &report.ledger {
        if entry.event.kind() != EventKind::IssueClosed {
            continue;
        }
        if let Some(point) = points.iter_mut().find(|point| point.day == entry.event.date()) {
            point.issues += 1;
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use crate::xp::{RawEvent, XpConfig, XpEngine};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).expect("valid date")
    }

    #[test]
    fn window_fills_quiet_days_with_zero() {
        let engine = XpEngine::new(XpConfig::standard()).expect("valid config");
        let report = engine
            .run(&[
                RawEvent::new("2025-09-20", "issue_closed").with_story_points(2.0),
                RawEvent::new("2025-09-22", "docs"),
                RawEvent::new("2025-09-22", "issue_closed").with_story_points(1.0),
                RawEvent::new("2025-09-10", "docs"),
            ])
            .expect("runs");

        let series = report.recent_series(day(23), 7);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].day, day(17));
        assert_eq!(series[6].day, day(23));
        assert_eq!(series[0].weekday, "Wed");

        let busy = series.iter().find(|p| p.day == day(22)).expect("day present");
        assert_eq!(busy.events, 2);
        assert_eq!(busy.issues, 1);
        assert_eq!(busy.xp, report.daily[&day(22)].xp);

        let quiet = series.iter().find(|p| p.day == day(21)).expect("day present");
        assert_eq!((quiet.xp, quiet.events, quiet.issues), (0, 0, 0));
    }

    #[test]
    fn zero_length_window_is_empty() {
        let engine = XpEngine::new(XpConfig::standard()).expect("valid config");
        let report = engine.run(&[]).expect("runs");
        assert!(report.recent_series(day(23), 0).is_empty());
    }
}
