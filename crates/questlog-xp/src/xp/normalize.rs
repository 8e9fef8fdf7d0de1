use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tracing::debug;

use super::config::XpConfig;
use super::domain::{Event, EventKind, RawEvent};
use super::XpError;

/// Validates every raw event up front; the first bad record fails the run.
pub fn normalize_events(raw: &[RawEvent], config: &XpConfig) -> Result<Vec<Event>, XpError> {
    let tz = config.tz()?;
    raw.iter()
        .enumerate()
        .map(|(index, record)| normalize_event(index, record, tz))
        .collect()
}

fn normalize_event(index: usize, raw: &RawEvent, tz: Tz) -> Result<Event, XpError> {
    let kind = raw
        .kind
        .parse::<EventKind>()
        .map_err(|_| XpError::UnclassifiedKind {
            index,
            kind: raw.kind.clone(),
        })?;

    let date = parse_event_day(&raw.date, tz).ok_or_else(|| XpError::InvalidDate {
        index,
        value: raw.date.clone(),
    })?;

    if !raw.sp.is_finite() || raw.sp < 0.0 {
        return Err(XpError::InvalidStoryPoints {
            index,
            value: raw.sp,
        });
    }

    let assignees = if raw.assignees < 1 {
        debug!(index, assignees = raw.assignees, "crediting at least one assignee");
        1
    } else {
        u32::try_from(raw.assignees).unwrap_or(u32::MAX)
    };

    Ok(
        Event::new(date, kind, raw.sp, assignees, raw.pr_closes)
            .with_reference(raw.title.clone(), raw.number),
    )
}

/// Plain dates are taken as-is; timestamps land on their day in `tz`.
pub(crate) fn parse_event_day(value: &str, tz: Tz) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&tz).date_naive())
}
